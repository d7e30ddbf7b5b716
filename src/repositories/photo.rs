use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::time::{Duration, sleep};

use crate::entities::photo::Photo;
use crate::errors::{FetchError, FetchResult};

static WIDTH_OPTIONS: [u32; 3] = [800, 1000, 1200];
static HEIGHT_OPTIONS: [u32; 5] = [600, 800, 1000, 1200, 1400];
static TITLES: [&str; 15] = [
    "Beautiful Landscape",
    "City Architecture",
    "Nature Photography",
    "Abstract Art",
    "Street Photography",
    "Portrait Session",
    "Minimalist Design",
    "Urban Exploration",
    "Natural Beauty",
    "Creative Composition",
    "Sunset Views",
    "Mountain Adventure",
    "Ocean Waves",
    "Forest Path",
    "Desert Landscape",
];
static AUTHORS: [&str; 8] = [
    "Alex Johnson",
    "Maria Garcia",
    "John Smith",
    "Emma Wilson",
    "David Lee",
    "Sofia Martinez",
    "James Brown",
    "Olivia Taylor",
];

#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn load_photos(&self, page: u32) -> FetchResult<Vec<Photo>>;
}

/// How item content is produced for a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentMode {
    /// Dimensions, title and author are resampled on every fetch, so
    /// refetching a page yields different content for the same ids.
    #[default]
    Random,
    /// Content is a pure function of the seed and the item position.
    Seeded(u64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOptions {
    #[serde(default = "RepositoryOptions::default_page_size")]
    pub page_size: u32,
    #[serde(default = "RepositoryOptions::default_min_latency_ms")]
    pub min_latency_ms: u64,
    #[serde(default = "RepositoryOptions::default_max_latency_ms")]
    pub max_latency_ms: u64,
    #[serde(default = "RepositoryOptions::default_error_rate")]
    pub error_rate: f64,
    #[serde(default)]
    pub content: ContentMode,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            min_latency_ms: Self::default_min_latency_ms(),
            max_latency_ms: Self::default_max_latency_ms(),
            error_rate: Self::default_error_rate(),
            content: ContentMode::default(),
        }
    }
}

impl RepositoryOptions {
    /// No latency and no injected failures. Content stays random.
    pub fn immediate() -> Self {
        Self {
            min_latency_ms: 0,
            max_latency_ms: 0,
            error_rate: 0.0,
            ..Self::default()
        }
    }

    fn default_page_size() -> u32 {
        SimulatedPhotoRepository::PAGE_SIZE
    }

    fn default_min_latency_ms() -> u64 {
        500
    }

    fn default_max_latency_ms() -> u64 {
        1500
    }

    fn default_error_rate() -> f64 {
        0.1
    }
}

/// In-process stand-in for a paginated photo backend. Every call waits a
/// random network-like delay, fails with a fixed probability and otherwise
/// returns one full page of generated photos. Pages never run out.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPhotoRepository {
    options: RepositoryOptions,
}

impl SimulatedPhotoRepository {
    pub const PAGE_SIZE: u32 = 20;
    pub const NETWORK_ERROR_MESSAGE: &'static str = "Network error: Failed to fetch photos";

    pub fn new() -> Self {
        Self::with_options(RepositoryOptions::default())
    }

    pub fn with_options(options: RepositoryOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    /// Builds one full page without waiting or failing.
    pub fn generate_photos(&self, page: u32) -> Vec<Photo> {
        let page_size = u64::from(self.options.page_size);
        let start_id = u64::from(page) * page_size;

        (0..page_size)
            .map(|offset| {
                let id = start_id + offset;
                match self.options.content {
                    ContentMode::Random => Self::generate_photo(&mut rand::thread_rng(), id),
                    ContentMode::Seeded(seed) => {
                        let mut rng = StdRng::seed_from_u64(Self::item_seed(seed, id));
                        Self::generate_photo(&mut rng, id)
                    }
                }
            })
            .collect()
    }

    fn generate_photo<R: Rng + ?Sized>(rng: &mut R, id: u64) -> Photo {
        let width = WIDTH_OPTIONS.choose(rng).copied().unwrap_or(WIDTH_OPTIONS[0]);
        let height = HEIGHT_OPTIONS.choose(rng).copied().unwrap_or(HEIGHT_OPTIONS[0]);
        let title = TITLES.choose(rng).copied().unwrap_or(TITLES[0]);
        let author = AUTHORS.choose(rng).copied().unwrap_or(AUTHORS[0]);

        Photo::new(
            id.to_string(),
            format!("https://picsum.photos/seed/photo{id}/{width}/{height}"),
            width,
            height,
            format!("{title} #{id}"),
        )
        .with_author(author)
    }

    fn item_seed(seed: u64, id: u64) -> u64 {
        seed ^ id.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    fn sample_latency(&self) -> Duration {
        let min = self.options.min_latency_ms;
        let max = self.options.max_latency_ms;
        let millis = if min < max {
            rand::thread_rng().gen_range(min..max)
        } else {
            min
        };
        Duration::from_millis(millis)
    }

    fn should_fail(&self) -> bool {
        let rate = self.options.error_rate;
        rate > 0.0 && rand::thread_rng().gen_bool(rate.min(1.0))
    }
}

#[async_trait]
impl PhotoRepository for SimulatedPhotoRepository {
    async fn load_photos(&self, page: u32) -> FetchResult<Vec<Photo>> {
        let latency = self.sample_latency();
        if !latency.is_zero() {
            sleep(latency).await;
        }

        if self.should_fail() {
            log::debug!("simulated failure for page {}", page);
            return Err(FetchError::message(Self::NETWORK_ERROR_MESSAGE));
        }

        Ok(self.generate_photos(page))
    }
}
