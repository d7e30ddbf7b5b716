pub mod config;
pub mod pager;
pub mod photo_paging_source;
pub mod source;

pub use config::PagingConfig;
pub use pager::{CombinedLoadStates, LoadState, Pager, PagingSnapshot};
pub use photo_paging_source::PhotoPagingSource;
pub use source::{LoadParams, LoadResult, Page, PagingSource, PagingState};
