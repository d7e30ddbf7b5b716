use async_trait::async_trait;
use photo_feed::entities::Photo;
use photo_feed::errors::{FetchError, FetchResult};
use photo_feed::paging::{LoadState, Pager, PagingConfig, PhotoPagingSource};
use photo_feed::presentation::{FeedScreenState, GridFooter};
use photo_feed::repositories::{PhotoRepository, RepositoryOptions, SimulatedPhotoRepository};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::{Duration, sleep, timeout};

struct RecordingRepository {
    calls: Mutex<Vec<u32>>,
    fail_once: Mutex<HashSet<u32>>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: AtomicUsize,
    generator: SimulatedPhotoRepository,
}

impl RecordingRepository {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_once: Mutex::new(HashSet::new()),
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            generator: SimulatedPhotoRepository::with_options(RepositoryOptions::immediate()),
        }
    }

    fn failing_once(self, page: u32) -> Self {
        self.fail_once.lock().unwrap().insert(page);
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoRepository for RecordingRepository {
    async fn load_photos(&self, page: u32) -> FetchResult<Vec<Photo>> {
        self.calls.lock().unwrap().push(page);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);

        if self.fail_once.lock().unwrap().remove(&page) {
            return Err(FetchError::message("boom"));
        }
        Ok(self.generator.generate_photos(page))
    }
}

fn pager_for(repository: &Arc<RecordingRepository>) -> Pager<PhotoPagingSource> {
    let repository: Arc<dyn PhotoRepository> = repository.clone();
    Pager::new(PagingConfig::default(), PhotoPagingSource::new(repository))
}

fn ids(pager: &Pager<PhotoPagingSource>) -> Vec<String> {
    pager
        .snapshot()
        .items
        .into_iter()
        .map(|photo| photo.id)
        .collect()
}

#[tokio::test]
async fn start_loads_the_first_page_once() {
    let repository = Arc::new(RecordingRepository::new());
    let pager = pager_for(&repository);

    pager.start().await;
    pager.start().await;

    assert_eq!(repository.calls(), vec![0]);
    assert_eq!(pager.item_count(), 20);
    assert_eq!(ids(&pager)[0], "0");
    assert_eq!(ids(&pager)[19], "19");

    let states = pager.load_states();
    assert_eq!(states.refresh, LoadState::idle());
    assert!(states.prepend.end_of_pagination_reached());
    assert_eq!(states.append, LoadState::idle());
}

#[tokio::test]
async fn reading_near_the_end_prefetches_the_next_page() {
    let repository = Arc::new(RecordingRepository::new());
    let pager = pager_for(&repository);
    pager.start().await;

    assert_eq!(pager.get(5).map(|photo| photo.id), Some("5".to_string()));
    pager.settle().await;
    assert_eq!(repository.calls(), vec![0]);

    assert!(pager.get(10).is_some());
    pager.settle().await;
    assert_eq!(repository.calls(), vec![0, 1]);
    assert_eq!(pager.item_count(), 40);
    assert_eq!(ids(&pager)[39], "39");
}

#[tokio::test]
async fn reading_past_the_loaded_items_returns_none() {
    let repository = Arc::new(RecordingRepository::new());
    let pager = pager_for(&repository);
    pager.start().await;

    assert!(pager.get(25).is_none());
}

#[tokio::test]
async fn failed_append_is_kept_until_retried_with_the_same_key() {
    let repository = Arc::new(RecordingRepository::new().failing_once(1));
    let pager = pager_for(&repository);
    pager.start().await;

    pager.append().await;
    let states = pager.load_states();
    assert_eq!(
        states.append.error().map(|error| error.to_string()),
        Some("boom".to_string())
    );
    assert_eq!(pager.item_count(), 20);
    assert_eq!(
        FeedScreenState::from_snapshot(&pager.snapshot()),
        FeedScreenState::Grid {
            item_count: 20,
            footer: Some(GridFooter::Error {
                message: "boom".to_string()
            }),
        }
    );

    // prefetch never retries on its own
    pager.get(19);
    pager.settle().await;
    assert_eq!(repository.calls(), vec![0, 1]);

    pager.retry().await;
    assert_eq!(repository.calls(), vec![0, 1, 1]);
    assert_eq!(pager.item_count(), 40);
    assert_eq!(pager.load_states().append, LoadState::idle());
}

#[tokio::test]
async fn failed_initial_load_shows_error_and_retry_recovers() {
    let repository = Arc::new(RecordingRepository::new().failing_once(0));
    let pager = pager_for(&repository);

    pager.start().await;
    assert_eq!(
        FeedScreenState::from_snapshot(&pager.snapshot()),
        FeedScreenState::InitialError {
            message: "boom".to_string()
        }
    );

    pager.retry().await;
    assert_eq!(repository.calls(), vec![0, 0]);
    assert_eq!(pager.item_count(), 20);
    assert_eq!(pager.load_states().refresh, LoadState::idle());
}

#[tokio::test]
async fn subscribers_share_cached_pages() {
    let repository = Arc::new(RecordingRepository::new());
    let pager = pager_for(&repository);
    pager.start().await;

    let first = pager.subscribe();
    let mut second = pager.subscribe();
    assert_eq!(first.borrow().item_count(), 20);
    assert_eq!(second.borrow().item_count(), 20);

    pager.start().await;
    assert_eq!(repository.calls(), vec![0]);

    pager.append().await;
    assert!(second.has_changed().unwrap());
    assert_eq!(second.borrow_and_update().item_count(), 40);
}

#[tokio::test]
async fn refresh_reloads_around_the_anchor_and_prepend_fills_in() {
    let repository = Arc::new(RecordingRepository::new());
    let pager = pager_for(&repository);
    pager.start().await;
    pager.append().await;
    pager.append().await;
    assert_eq!(pager.item_count(), 60);

    pager.get(45);
    pager.settle().await;
    pager.refresh().await;

    assert_eq!(repository.calls(), vec![0, 1, 2, 2]);
    assert_eq!(pager.item_count(), 20);
    assert_eq!(ids(&pager)[0], "40");
    assert_eq!(pager.load_states().prepend, LoadState::idle());

    pager.get(3);
    pager.settle().await;
    assert_eq!(repository.calls(), vec![0, 1, 2, 2, 1]);
    assert_eq!(pager.item_count(), 40);
    assert_eq!(ids(&pager)[0], "20");
    assert_eq!(ids(&pager)[20], "40");
}

#[tokio::test]
async fn only_one_fetch_runs_at_a_time() {
    let repository = Arc::new(RecordingRepository::new().with_delay(Duration::from_millis(20)));
    let pager = pager_for(&repository);
    pager.start().await;

    tokio::join!(pager.append(), pager.append());

    assert_eq!(repository.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(repository.calls(), vec![0, 1, 2]);
    assert_eq!(pager.item_count(), 60);
}

#[tokio::test]
async fn abandoned_refresh_leaves_no_loading_state_behind() {
    let repository = Arc::new(RecordingRepository::new().with_delay(Duration::from_millis(200)));
    let pager = pager_for(&repository);

    let outcome = timeout(Duration::from_millis(30), pager.refresh()).await;

    assert!(outcome.is_err());
    assert_eq!(pager.load_states().refresh, LoadState::idle());
    assert_eq!(pager.item_count(), 0);
}

#[tokio::test]
async fn abandoned_start_is_restarted_by_the_next_start() {
    let repository = Arc::new(RecordingRepository::new().with_delay(Duration::from_millis(100)));
    let pager = pager_for(&repository);

    let outcome = timeout(Duration::from_millis(20), pager.start()).await;
    assert!(outcome.is_err());
    assert_eq!(pager.item_count(), 0);

    pager.start().await;

    assert_eq!(repository.calls(), vec![0, 0]);
    assert_eq!(pager.item_count(), 20);
    assert_eq!(pager.get(0).map(|photo| photo.id), Some("0".to_string()));

    pager.start().await;
    assert_eq!(repository.calls(), vec![0, 0]);
}

#[tokio::test]
async fn dropping_the_pager_cancels_the_background_fetch() {
    let repository = Arc::new(RecordingRepository::new().with_delay(Duration::from_millis(100)));
    let pager = pager_for(&repository);
    pager.start().await;
    assert_eq!(repository.completed.load(Ordering::SeqCst), 1);

    pager.get(15);
    sleep(Duration::from_millis(20)).await;
    assert_eq!(repository.calls(), vec![0, 1]);

    drop(pager);
    sleep(Duration::from_millis(200)).await;

    assert_eq!(repository.completed.load(Ordering::SeqCst), 1);
}
