use photo_feed::entities::Photo;
use photo_feed::errors::FetchError;
use photo_feed::paging::{CombinedLoadStates, LoadState, PagingSnapshot};
use photo_feed::presentation::feed_screen::{item_key, show_scroll_to_top};
use photo_feed::presentation::{FeedScreenState, GridFooter};

fn snapshot(items: usize, refresh: LoadState, append: LoadState) -> PagingSnapshot<Photo> {
    PagingSnapshot {
        items: (0..items)
            .map(|index| Photo::new(index.to_string(), "u", 800, 600, "t"))
            .collect(),
        load_states: CombinedLoadStates {
            refresh,
            prepend: LoadState::idle(),
            append,
        },
    }
}

#[test]
fn initial_load_shows_the_spinner() {
    let state = FeedScreenState::from_snapshot(&snapshot(0, LoadState::Loading, LoadState::idle()));
    assert_eq!(state, FeedScreenState::InitialLoading);
    assert!(!state.is_retryable());
}

#[test]
fn initial_failure_offers_retry_with_its_message() {
    let error = LoadState::Error(FetchError::message("Network error: Failed to fetch photos"));
    let state = FeedScreenState::from_snapshot(&snapshot(0, error, LoadState::idle()));

    assert_eq!(
        state,
        FeedScreenState::InitialError {
            message: "Network error: Failed to fetch photos".to_string()
        }
    );
    assert!(state.is_retryable());
}

#[test]
fn empty_messages_fall_back_to_defaults() {
    let refresh = LoadState::Error(FetchError::message(""));
    assert_eq!(
        FeedScreenState::from_snapshot(&snapshot(0, refresh, LoadState::idle())),
        FeedScreenState::InitialError {
            message: "Unknown error".to_string()
        }
    );

    let append = LoadState::Error(FetchError::message(""));
    assert_eq!(
        FeedScreenState::from_snapshot(&snapshot(20, LoadState::idle(), append)),
        FeedScreenState::Grid {
            item_count: 20,
            footer: Some(GridFooter::Error {
                message: "Error loading more".to_string()
            }),
        }
    );
}

#[test]
fn refresh_with_items_keeps_showing_the_grid() {
    let state = FeedScreenState::from_snapshot(&snapshot(
        20,
        LoadState::Error(FetchError::message("boom")),
        LoadState::idle(),
    ));
    assert_eq!(
        state,
        FeedScreenState::Grid {
            item_count: 20,
            footer: None
        }
    );
}

#[test]
fn append_in_progress_shows_a_loading_footer() {
    let state = FeedScreenState::from_snapshot(&snapshot(40, LoadState::idle(), LoadState::Loading));
    assert_eq!(
        state,
        FeedScreenState::Grid {
            item_count: 40,
            footer: Some(GridFooter::Loading),
        }
    );
}

#[test]
fn scroll_to_top_appears_past_the_tenth_item() {
    assert!(!show_scroll_to_top(0));
    assert!(!show_scroll_to_top(10));
    assert!(show_scroll_to_top(11));
}

#[test]
fn item_keys_prefer_the_photo_id() {
    let photo = Photo::new("17", "u", 800, 600, "t");
    assert_eq!(item_key(Some(&photo), 3), "17");
    assert_eq!(item_key(None, 3), "item_3");
}
