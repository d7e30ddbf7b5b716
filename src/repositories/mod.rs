pub mod photo;

pub use photo::{ContentMode, PhotoRepository, RepositoryOptions, SimulatedPhotoRepository};
