pub mod route;

pub use route::Screen;
