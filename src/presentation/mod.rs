pub mod feed_screen;

pub use feed_screen::{FeedScreenState, GridFooter};
