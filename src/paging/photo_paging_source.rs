use async_trait::async_trait;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super::source::{LoadParams, LoadResult, Page, PagingSource, PagingState};
use crate::entities::photo::Photo;
use crate::errors::FetchError;
use crate::repositories::photo::PhotoRepository;

/// Serves repository pages keyed by page index, starting at 0. The
/// repository decides how many items a page holds; the requested
/// `load_size` is only logged.
pub struct PhotoPagingSource {
    repository: Arc<dyn PhotoRepository>,
}

impl PhotoPagingSource {
    pub const FIRST_PAGE: u32 = 0;

    pub fn new(repository: Arc<dyn PhotoRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn PhotoRepository> {
        &self.repository
    }

    /// Wraps one repository result as a page. Page 0 has no previous key and
    /// an empty page ends the stream.
    pub fn to_page(page: u32, photos: Vec<Photo>) -> Page<u32, Photo> {
        let prev_key = if page == Self::FIRST_PAGE {
            None
        } else {
            page.checked_sub(1)
        };
        let next_key = if photos.is_empty() {
            None
        } else {
            page.checked_add(1)
        };
        Page::new(photos, prev_key, next_key)
    }

    /// Key to reload when restarting around `anchor_page`.
    pub fn refresh_key_for<V>(anchor_page: &Page<u32, V>) -> Option<u32> {
        anchor_page
            .prev_key
            .and_then(|key| key.checked_add(1))
            .or_else(|| anchor_page.next_key.and_then(|key| key.checked_sub(1)))
    }

    fn panic_message(payload: Box<dyn Any + Send>) -> String {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|text| text.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        format!("Unexpected failure while fetching photos: {detail}")
    }
}

#[async_trait]
impl PagingSource for PhotoPagingSource {
    type Key = u32;
    type Value = Photo;

    async fn load(&self, params: LoadParams<u32>) -> LoadResult<u32, Photo> {
        let page = params.key().unwrap_or(Self::FIRST_PAGE);
        log::debug!(
            "Fetching page {} (requested {} items)",
            page,
            params.load_size()
        );

        let outcome = AssertUnwindSafe(self.repository.load_photos(page))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(photos)) => LoadResult::Page(Self::to_page(page, photos)),
            Ok(Err(error)) => LoadResult::Error(error),
            Err(payload) => {
                let message = Self::panic_message(payload);
                log::error!("Page {} load panicked: {}", page, message);
                LoadResult::Error(FetchError::message(message))
            }
        }
    }

    fn refresh_key(&self, state: &PagingState<u32, Photo>) -> Option<u32> {
        let anchor = state.anchor_position?;
        let anchor_page = state.closest_page_to_position(anchor)?;
        Self::refresh_key_for(anchor_page)
    }
}
