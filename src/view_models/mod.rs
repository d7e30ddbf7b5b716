pub mod photo_view_model;

pub use photo_view_model::PhotoViewModel;
