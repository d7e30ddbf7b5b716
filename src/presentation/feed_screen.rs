use crate::entities::photo::Photo;
use crate::paging::{LoadState, PagingSnapshot};

pub const GRID_COLUMNS: usize = 2;
pub const IMAGE_TARGET_SIZE: u32 = 600;
pub const SCROLL_TO_TOP_THRESHOLD: usize = 10;

const UNKNOWN_ERROR: &str = "Unknown error";
const APPEND_ERROR: &str = "Error loading more";

/// Row appended under the grid while more photos are loading or failed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridFooter {
    Loading,
    Error { message: String },
}

/// What the feed shows for a given paging snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScreenState {
    /// First load in progress with nothing to show yet.
    InitialLoading,
    /// First load failed with nothing to show. Offers a retry.
    InitialError { message: String },
    Grid {
        item_count: usize,
        footer: Option<GridFooter>,
    },
}

impl FeedScreenState {
    pub fn from_snapshot<V>(snapshot: &PagingSnapshot<V>) -> Self {
        let item_count = snapshot.item_count();
        let states = &snapshot.load_states;

        if item_count == 0 {
            match &states.refresh {
                LoadState::Loading => return FeedScreenState::InitialLoading,
                LoadState::Error(error) => {
                    return FeedScreenState::InitialError {
                        message: message_or(error.text(), UNKNOWN_ERROR),
                    };
                }
                LoadState::NotLoading { .. } => {}
            }
        }

        let footer = match &states.append {
            LoadState::Loading => Some(GridFooter::Loading),
            LoadState::Error(error) => Some(GridFooter::Error {
                message: message_or(error.text(), APPEND_ERROR),
            }),
            LoadState::NotLoading { .. } => None,
        };

        FeedScreenState::Grid { item_count, footer }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FeedScreenState::InitialError { .. }
                | FeedScreenState::Grid {
                    footer: Some(GridFooter::Error { .. }),
                    ..
                }
        )
    }
}

fn message_or(message: &str, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}

pub fn show_scroll_to_top(first_visible_item_index: usize) -> bool {
    first_visible_item_index > SCROLL_TO_TOP_THRESHOLD
}

/// Stable key for a grid cell.
pub fn item_key(photo: Option<&Photo>, index: usize) -> String {
    match photo {
        Some(photo) => photo.id.clone(),
        None => format!("item_{index}"),
    }
}
