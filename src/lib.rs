pub mod config;
pub mod entities;
pub mod errors;
pub mod navigation;
pub mod paging;
pub mod presentation;
pub mod repositories;
pub mod view_models;
