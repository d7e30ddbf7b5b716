use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::task::JoinHandle;

use super::config::PagingConfig;
use super::source::{LoadParams, LoadResult, Page, PagingSource, PagingState};
use crate::errors::FetchError;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    NotLoading { end_of_pagination_reached: bool },
    Loading,
    Error(FetchError),
}

impl LoadState {
    pub fn idle() -> Self {
        LoadState::NotLoading {
            end_of_pagination_reached: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            LoadState::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn end_of_pagination_reached(&self) -> bool {
        matches!(
            self,
            LoadState::NotLoading {
                end_of_pagination_reached: true
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombinedLoadStates {
    pub refresh: LoadState,
    pub prepend: LoadState,
    pub append: LoadState,
}

impl Default for CombinedLoadStates {
    fn default() -> Self {
        Self {
            refresh: LoadState::idle(),
            prepend: LoadState::idle(),
            append: LoadState::idle(),
        }
    }
}

/// Everything loaded so far, flattened, plus where each direction stands.
#[derive(Debug, Clone)]
pub struct PagingSnapshot<V> {
    pub items: Vec<V>,
    pub load_states: CombinedLoadStates,
}

impl<V> PagingSnapshot<V> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            load_states: CombinedLoadStates::default(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.items.get(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadType {
    Refresh,
    Prepend,
    Append,
}

struct PagerState<K, V> {
    pages: Vec<Page<K, V>>,
    load_states: CombinedLoadStates,
    anchor_position: Option<usize>,
}

impl<K: Clone, V: Clone> PagerState<K, V> {
    fn load_state_mut(&mut self, load_type: LoadType) -> &mut LoadState {
        match load_type {
            LoadType::Refresh => &mut self.load_states.refresh,
            LoadType::Prepend => &mut self.load_states.prepend,
            LoadType::Append => &mut self.load_states.append,
        }
    }

    fn item_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    fn item(&self, index: usize) -> Option<V> {
        self.pages
            .iter()
            .flat_map(|page| page.data.iter())
            .nth(index)
            .cloned()
    }

    fn snapshot(&self) -> PagingSnapshot<V> {
        PagingSnapshot {
            items: self
                .pages
                .iter()
                .flat_map(|page| page.data.iter().cloned())
                .collect(),
            load_states: self.load_states.clone(),
        }
    }

    fn paging_state(&self, config: &PagingConfig) -> PagingState<K, V> {
        PagingState {
            pages: self.pages.clone(),
            anchor_position: self.anchor_position,
            config: *config,
        }
    }
}

struct PagerInner<S: PagingSource> {
    source: Arc<S>,
    config: PagingConfig,
    // One fetch in flight at a time, across all directions.
    gate: AsyncMutex<()>,
    state: Mutex<PagerState<S::Key, S::Value>>,
    snapshots: watch::Sender<PagingSnapshot<S::Value>>,
}

impl<S: PagingSource> PagerInner<S> {
    fn lock_state(&self) -> MutexGuard<'_, PagerState<S::Key, S::Value>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<F>(&self, change: F)
    where
        F: FnOnce(&mut PagerState<S::Key, S::Value>),
    {
        let snapshot = {
            let mut state = self.lock_state();
            change(&mut *state);
            state.snapshot()
        };
        self.snapshots.send_replace(snapshot);
    }

    async fn load(&self, load_type: LoadType) {
        let _permit = self.gate.lock().await;

        let Some(params) = self.next_params(load_type) else {
            return;
        };

        self.update(|state| *state.load_state_mut(load_type) = LoadState::Loading);
        let mut in_flight = InFlight {
            inner: self,
            load_type,
            completed: false,
        };

        log::debug!("Loading {:?} page with {:?}", load_type, params);
        let result = self.source.load(params).await;
        in_flight.completed = true;

        match result {
            LoadResult::Page(page) => {
                log::debug!("{:?} load returned {} items", load_type, page.len());
                self.apply_page(load_type, page);
            }
            LoadResult::Error(error) => {
                log::warn!("{:?} load failed: {}", load_type, error);
                self.update(|state| *state.load_state_mut(load_type) = LoadState::Error(error));
            }
        }
    }

    fn next_params(&self, load_type: LoadType) -> Option<LoadParams<S::Key>> {
        match load_type {
            LoadType::Refresh => {
                let state = self.lock_state();
                let key = if state.pages.is_empty() {
                    None
                } else {
                    self.source.refresh_key(&state.paging_state(&self.config))
                };
                Some(LoadParams::Refresh {
                    key,
                    load_size: self.config.initial_load_size,
                })
            }
            LoadType::Append | LoadType::Prepend => {
                let boundary_key = {
                    let state = self.lock_state();
                    if state.pages.is_empty() {
                        log::debug!("Skipping {:?} load before the first refresh", load_type);
                        return None;
                    }
                    if load_type == LoadType::Append {
                        state.pages.last().and_then(|page| page.next_key)
                    } else {
                        state.pages.first().and_then(|page| page.prev_key)
                    }
                };

                let Some(key) = boundary_key else {
                    self.update(|state| {
                        *state.load_state_mut(load_type) = LoadState::NotLoading {
                            end_of_pagination_reached: true,
                        }
                    });
                    return None;
                };

                let load_size = self.config.page_size;
                Some(if load_type == LoadType::Append {
                    LoadParams::Append { key, load_size }
                } else {
                    LoadParams::Prepend { key, load_size }
                })
            }
        }
    }

    fn apply_page(&self, load_type: LoadType, page: Page<S::Key, S::Value>) {
        self.update(|state| match load_type {
            LoadType::Refresh => {
                state.load_states = CombinedLoadStates {
                    refresh: LoadState::idle(),
                    prepend: LoadState::NotLoading {
                        end_of_pagination_reached: page.prev_key.is_none(),
                    },
                    append: LoadState::NotLoading {
                        end_of_pagination_reached: page.next_key.is_none(),
                    },
                };
                state.pages = vec![page];
            }
            LoadType::Append => {
                state.load_states.append = LoadState::NotLoading {
                    end_of_pagination_reached: page.next_key.is_none(),
                };
                state.pages.push(page);
            }
            LoadType::Prepend => {
                state.load_states.prepend = LoadState::NotLoading {
                    end_of_pagination_reached: page.prev_key.is_none(),
                };
                let inserted = page.len();
                state.pages.insert(0, page);
                if let Some(anchor) = state.anchor_position.as_mut() {
                    *anchor += inserted;
                }
            }
        });
    }
}

/// Puts the load state back to idle when a fetch is dropped before it
/// finishes, so an abandoned request never shows up as loading or failed.
struct InFlight<'a, S: PagingSource> {
    inner: &'a PagerInner<S>,
    load_type: LoadType,
    completed: bool,
}

impl<S: PagingSource> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        let load_type = self.load_type;
        log::debug!("{:?} load abandoned", load_type);
        self.inner
            .update(|state| *state.load_state_mut(load_type) = LoadState::idle());
    }
}

/// Clears the started flag unless the initial load ran to completion.
struct StartLatch<'a> {
    started: &'a AtomicBool,
    finished: bool,
}

impl Drop for StartLatch<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log::debug!("Initial load abandoned, next start will reload");
            self.started.store(false, Ordering::SeqCst);
        }
    }
}

/// Drives a [`PagingSource`]: keeps the loaded pages, publishes snapshots to
/// any number of observers and fetches more as items near the edges are
/// read. Observers share the cached pages; subscribing never refetches.
pub struct Pager<S: PagingSource> {
    inner: Arc<PagerInner<S>>,
    started: AtomicBool,
    background: Mutex<Option<JoinHandle<()>>>,
}

impl<S: PagingSource> Pager<S> {
    pub fn new(config: PagingConfig, source: S) -> Self {
        let (snapshots, _) = watch::channel(PagingSnapshot::empty());
        Self {
            inner: Arc::new(PagerInner {
                source: Arc::new(source),
                config: config.normalized(),
                gate: AsyncMutex::new(()),
                state: Mutex::new(PagerState {
                    pages: Vec::new(),
                    load_states: CombinedLoadStates::default(),
                    anchor_position: None,
                }),
                snapshots,
            }),
            started: AtomicBool::new(false),
            background: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &PagingConfig {
        &self.inner.config
    }

    pub fn source(&self) -> &Arc<S> {
        &self.inner.source
    }

    pub fn subscribe(&self) -> watch::Receiver<PagingSnapshot<S::Value>> {
        self.inner.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> PagingSnapshot<S::Value> {
        self.inner.snapshots.borrow().clone()
    }

    pub fn load_states(&self) -> CombinedLoadStates {
        self.inner.lock_state().load_states.clone()
    }

    pub fn item_count(&self) -> usize {
        self.inner.lock_state().item_count()
    }

    /// Runs the initial load once. Later calls return immediately, leaving
    /// the cached pages untouched. An initial load that is dropped before it
    /// finishes does not count, so the next call starts it again.
    pub async fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut latch = StartLatch {
            started: &self.started,
            finished: false,
        };
        self.inner.load(LoadType::Refresh).await;
        latch.finished = true;
    }

    /// Reloads around the last read position and replaces every page.
    pub async fn refresh(&self) {
        self.inner.load(LoadType::Refresh).await;
        self.started.store(true, Ordering::SeqCst);
    }

    pub async fn append(&self) {
        self.inner.load(LoadType::Append).await;
    }

    pub async fn prepend(&self) {
        self.inner.load(LoadType::Prepend).await;
    }

    /// Re-issues the request that last failed, with the same key.
    pub async fn retry(&self) {
        let states = self.load_states();
        if states.refresh.error().is_some() {
            self.inner.load(LoadType::Refresh).await;
            return;
        }
        if states.prepend.error().is_some() {
            self.inner.load(LoadType::Prepend).await;
        }
        if states.append.error().is_some() {
            self.inner.load(LoadType::Append).await;
        }
    }

    /// Reads one item and records its index as the anchor. Reading within
    /// the prefetch distance of either edge schedules a background load for
    /// that edge unless it is busy, failed or exhausted.
    pub fn get(&self, index: usize) -> Option<S::Value> {
        let (item, boundary) = {
            let mut state = self.inner.lock_state();
            state.anchor_position = Some(index);

            let distance = self.inner.config.prefetch_distance;
            let idle = LoadState::idle();
            let boundary = if state.pages.is_empty() || state.load_states.refresh.is_loading() {
                None
            } else if index.saturating_add(distance) >= state.item_count()
                && state.load_states.append == idle
            {
                Some(LoadType::Append)
            } else if index < distance && state.load_states.prepend == idle {
                Some(LoadType::Prepend)
            } else {
                None
            };

            (state.item(index), boundary)
        };

        if let Some(load_type) = boundary {
            self.spawn_load(load_type);
        }
        item
    }

    /// Waits for the background load started by [`Pager::get`], if any.
    pub async fn settle(&self) {
        let handle = self
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn spawn_load(&self, load_type: LoadType) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::debug!("No runtime available for {:?} prefetch", load_type);
            return;
        };

        let mut slot = self.background.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let inner = Arc::clone(&self.inner);
        *slot = Some(runtime.spawn(async move {
            inner.load(load_type).await;
        }));
    }
}

impl<S: PagingSource> Drop for Pager<S> {
    fn drop(&mut self) {
        let slot = self
            .background
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}
