use std::sync::Arc;
use tokio::sync::watch;

use crate::entities::scroll_state::ScrollState;
use crate::paging::{Pager, PagingConfig, PhotoPagingSource};
use crate::repositories::photo::{PhotoRepository, SimulatedPhotoRepository};

/// State that outlives any single rendering of the feed: the photo stream
/// and the last scroll position. Build it once and hand it to every screen.
pub struct PhotoViewModel {
    photos: Pager<PhotoPagingSource>,
    scroll_state: watch::Sender<ScrollState>,
}

impl PhotoViewModel {
    pub fn new() -> Self {
        Self::with_repository(
            PagingConfig::default(),
            Arc::new(SimulatedPhotoRepository::new()),
        )
    }

    pub fn with_repository(config: PagingConfig, repository: Arc<dyn PhotoRepository>) -> Self {
        let (scroll_state, _) = watch::channel(ScrollState::default());
        Self {
            photos: Pager::new(config, PhotoPagingSource::new(repository)),
            scroll_state,
        }
    }

    /// The shared photo stream. Every caller gets the same pager, so
    /// re-subscribing after a reconfiguration reuses the loaded pages.
    pub fn photos(&self) -> &Pager<PhotoPagingSource> {
        &self.photos
    }

    pub fn scroll_state(&self) -> watch::Receiver<ScrollState> {
        self.scroll_state.subscribe()
    }

    pub fn current_scroll_state(&self) -> ScrollState {
        *self.scroll_state.borrow()
    }

    pub fn save_scroll_position(
        &self,
        first_visible_item_index: usize,
        first_visible_item_scroll_offset: usize,
    ) {
        self.scroll_state.send_replace(ScrollState::new(
            first_visible_item_index,
            first_visible_item_scroll_offset,
        ));
    }

    pub fn clear_scroll_state(&self) {
        self.scroll_state.send_replace(ScrollState::default());
    }
}

impl Default for PhotoViewModel {
    fn default() -> Self {
        Self::new()
    }
}
