use async_trait::async_trait;

use super::config::PagingConfig;
use crate::errors::FetchError;

/// What a [`PagingSource`] is asked to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadParams<K> {
    /// First load, or a reload around `key`. `None` means start of data.
    Refresh { key: Option<K>, load_size: usize },
    Append { key: K, load_size: usize },
    Prepend { key: K, load_size: usize },
}

impl<K: Copy> LoadParams<K> {
    pub fn key(&self) -> Option<K> {
        match self {
            LoadParams::Refresh { key, .. } => *key,
            LoadParams::Append { key, .. } | LoadParams::Prepend { key, .. } => Some(*key),
        }
    }

    pub fn load_size(&self) -> usize {
        match self {
            LoadParams::Refresh { load_size, .. }
            | LoadParams::Append { load_size, .. }
            | LoadParams::Prepend { load_size, .. } => *load_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<K, V> {
    pub data: Vec<V>,
    pub prev_key: Option<K>,
    pub next_key: Option<K>,
}

impl<K, V> Page<K, V> {
    pub fn new(data: Vec<V>, prev_key: Option<K>, next_key: Option<K>) -> Self {
        Self {
            data,
            prev_key,
            next_key,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult<K, V> {
    Page(Page<K, V>),
    Error(FetchError),
}

/// The loaded pages as seen when picking a refresh key.
#[derive(Debug, Clone)]
pub struct PagingState<K, V> {
    pub pages: Vec<Page<K, V>>,
    pub anchor_position: Option<usize>,
    pub config: PagingConfig,
}

impl<K, V> PagingState<K, V> {
    /// Page holding the item at `position`. Positions past the loaded data
    /// resolve to the last page. `None` when nothing is loaded.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&Page<K, V>> {
        if self.pages.iter().all(Page::is_empty) {
            return None;
        }

        let mut remaining = position;
        for page in &self.pages {
            if remaining < page.len() {
                return Some(page);
            }
            remaining -= page.len();
        }

        self.pages.last()
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }
}

#[async_trait]
pub trait PagingSource: Send + Sync + 'static {
    type Key: Copy + Send + Sync + std::fmt::Debug + 'static;
    type Value: Clone + Send + Sync + 'static;

    /// Loads one page. Failures come back as [`LoadResult::Error`]; this
    /// never panics out to the caller.
    async fn load(&self, params: LoadParams<Self::Key>) -> LoadResult<Self::Key, Self::Value>;

    /// Key to reload from after a restart, given the current anchor.
    fn refresh_key(&self, state: &PagingState<Self::Key, Self::Value>) -> Option<Self::Key>;
}
