use serde::{Deserialize, Serialize};

/// Where the feed grid was last scrolled to: the first visible item and the
/// offset into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    pub first_visible_item_index: usize,
    pub first_visible_item_scroll_offset: usize,
}

impl ScrollState {
    pub fn new(first_visible_item_index: usize, first_visible_item_scroll_offset: usize) -> Self {
        Self {
            first_visible_item_index,
            first_visible_item_scroll_offset,
        }
    }
}
