pub mod photo;
pub mod scroll_state;

pub use photo::Photo;
pub use scroll_state::ScrollState;
