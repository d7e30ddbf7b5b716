use serde::{Deserialize, Serialize};

/// Tuning for a [`Pager`](super::Pager). The defaults are the values the
/// photo feed runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingConfig {
    #[serde(default = "PagingConfig::default_page_size")]
    pub page_size: usize,
    /// How many not yet visible items before the end of the loaded data
    /// trigger the next fetch.
    #[serde(default = "PagingConfig::default_prefetch_distance")]
    pub prefetch_distance: usize,
    /// Placeholders need a known total count, which an unbounded feed never
    /// has. The flag is carried for completeness and must stay off.
    #[serde(default)]
    pub enable_placeholders: bool,
    #[serde(default = "PagingConfig::default_initial_load_size")]
    pub initial_load_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            prefetch_distance: Self::default_prefetch_distance(),
            enable_placeholders: false,
            initial_load_size: Self::default_initial_load_size(),
        }
    }
}

impl PagingConfig {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            prefetch_distance: page_size,
            enable_placeholders: false,
            initial_load_size: page_size,
        }
    }

    pub fn with_prefetch_distance(mut self, prefetch_distance: usize) -> Self {
        self.prefetch_distance = prefetch_distance;
        self
    }

    pub fn with_initial_load_size(mut self, initial_load_size: usize) -> Self {
        self.initial_load_size = initial_load_size;
        self
    }

    /// Clamps sizes to at least one item and forces placeholders off.
    pub fn normalized(self) -> Self {
        Self {
            page_size: self.page_size.max(1),
            prefetch_distance: self.prefetch_distance,
            enable_placeholders: false,
            initial_load_size: self.initial_load_size.max(1),
        }
    }

    fn default_page_size() -> usize {
        20
    }

    fn default_prefetch_distance() -> usize {
        10
    }

    fn default_initial_load_size() -> usize {
        20
    }
}
