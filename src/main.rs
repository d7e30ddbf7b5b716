use anyhow::Result;
use std::sync::Arc;

use photo_feed::config::FeedConfiguration;
use photo_feed::navigation::Screen;
use photo_feed::presentation::{FeedScreenState, feed_screen};
use photo_feed::repositories::SimulatedPhotoRepository;
use photo_feed::view_models::PhotoViewModel;

const DEMO_PAGES: usize = 3;
const MAX_RETRIES: usize = 5;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = FeedConfiguration::load_default()?;
    log::info!("Starting photo feed with {:?}", config.paging);

    let repository = Arc::new(SimulatedPhotoRepository::with_options(
        config.repository.clone(),
    ));
    let view_model = PhotoViewModel::with_repository(config.paging, repository);
    let photos = view_model.photos();

    photos.start().await;
    let mut retries = 0;
    while let FeedScreenState::InitialError { message } =
        FeedScreenState::from_snapshot(&photos.snapshot())
    {
        if retries == MAX_RETRIES {
            log::error!("Giving up after {} retries: {}", retries, message);
            return Ok(());
        }
        log::warn!("Initial load failed ({}), retrying", message);
        retries += 1;
        photos.retry().await;
    }

    let target = photos.config().page_size * DEMO_PAGES;
    let mut index = 0;
    while index < target {
        if photos.get(index).is_some() {
            view_model.save_scroll_position(index, 0);
            index += 1;
            continue;
        }

        photos.settle().await;
        if photos.get(index).is_some() {
            continue;
        }

        let states = photos.load_states();
        if states.append.end_of_pagination_reached() {
            break;
        }
        if let Some(error) = states.append.error() {
            if retries == MAX_RETRIES {
                log::error!("Giving up on loading more photos: {}", error);
                break;
            }
            log::warn!("Loading more failed ({}), retrying", error);
            retries += 1;
            photos.retry().await;
        } else {
            photos.append().await;
        }
    }

    let scroll = view_model.current_scroll_state();
    log::info!(
        "Loaded {} photos, scrolled to {} (scroll to top shown: {})",
        photos.item_count(),
        scroll.first_visible_item_index,
        feed_screen::show_scroll_to_top(scroll.first_visible_item_index)
    );

    if let Some(photo) = photos.get(scroll.first_visible_item_index) {
        let route = Screen::Detail(photo).route();
        log::info!("Navigating to {}", route);
        match Screen::parse(&route) {
            Some(Screen::Detail(detail)) => log::info!(
                "Detail for {} by {} ({}x{}, ratio {:.2})",
                detail.title,
                detail.author,
                detail.width,
                detail.height,
                detail.aspect_ratio()
            ),
            other => log::warn!("Unexpected screen for {}: {:?}", route, other),
        }
    }

    let restored = *view_model.scroll_state().borrow();
    log::info!("Back on feed, restoring scroll position {:?}", restored);

    Ok(())
}

fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);
    let _ = builder.try_init();
}
