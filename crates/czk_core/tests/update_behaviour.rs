use std::sync::Once;

use czk_core::{update, AppState, Effect, FetchState, Msg, DEFAULT_FEED_URL};
use pretty_assertions::assert_eq;

const FEED: &str = "31 Dec\nCountry|Currency|Amount|Code|Rate\nEMU|euro|1|EUR|25.2\nUSA|dollar|1|USD|23.1\n";
const LATER_FEED: &str = "02 Jan\nCountry|Currency|Amount|Code|Rate\nUSA|dollar|1|USD|22.5\nEMU|euro|1|EUR|25.0\n";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(czk_logging::initialize_for_tests);
}

fn started() -> (AppState, u64) {
    let (state, effects) = update(AppState::new(), Msg::Startup);
    match effects.as_slice() {
        [Effect::FetchFeed { request_id, .. }] => (state, *request_id),
        other => panic!("expected a single fetch, got {other:?}"),
    }
}

fn loaded(text: &str) -> AppState {
    let (state, request_id) = started();
    let (state, _) = update(
        state,
        Msg::FeedFetched {
            request_id,
            text: text.to_string(),
            fetched_at: None,
        },
    );
    state
}

fn apply(state: AppState, msgs: impl IntoIterator<Item = Msg>) -> AppState {
    msgs.into_iter().fold(state, |state, msg| update(state, msg).0)
}

#[test]
fn startup_fetches_configured_url_once() {
    init_logging();
    let state = AppState::new().with_feed_url("https://rates.example.com/daily.txt");

    let (state, effects) = update(state, Msg::Startup);
    assert_eq!(
        effects,
        vec![Effect::FetchFeed {
            request_id: 1,
            url: "https://rates.example.com/daily.txt".to_string(),
        }]
    );
    assert!(state.view().loading);

    let (state, effects) = update(state, Msg::Startup);
    assert!(effects.is_empty());

    let (_state, effects) = update(state, Msg::Startup);
    assert!(effects.is_empty());
}

#[test]
fn default_state_targets_the_daily_fixing_feed() {
    init_logging();
    let (_state, effects) = update(AppState::new(), Msg::Startup);
    assert_eq!(
        effects,
        vec![Effect::FetchFeed {
            request_id: 1,
            url: DEFAULT_FEED_URL.to_string(),
        }]
    );
}

#[test]
fn fetched_feed_becomes_the_snapshot() {
    init_logging();
    let mut state = loaded(FEED);
    let view = state.view();

    assert_eq!(state.fetch_state(), FetchState::Loaded);
    assert!(!view.loading);
    assert_eq!(view.publication_date.as_deref(), Some("31 Dec"));
    assert_eq!(view.total_rows, 2);
    assert_eq!(
        view.options.iter().map(|o| o.code.as_str()).collect::<Vec<_>>(),
        vec!["EUR", "USD"]
    );
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn progress_updates_loading_byte_count() {
    init_logging();
    let (state, request_id) = started();
    let (state, _) = update(
        state,
        Msg::FetchProgress {
            request_id,
            bytes: 512,
        },
    );

    let view = state.view();
    assert!(view.loading);
    assert_eq!(view.loading_bytes, Some(512));
}

#[test]
fn failure_surfaces_message_and_keeps_previous_snapshot() {
    init_logging();
    let state = loaded(FEED);

    let (state, effects) = update(state, Msg::RefreshClicked);
    let request_id = match effects.as_slice() {
        [Effect::FetchFeed { request_id, .. }] => *request_id,
        other => panic!("expected a refresh fetch, got {other:?}"),
    };
    assert_eq!(request_id, 2);

    let (state, _) = update(
        state,
        Msg::FeedFailed {
            request_id,
            message: "http status 503".to_string(),
        },
    );

    let view = state.view();
    assert_eq!(state.fetch_state(), FetchState::Failed);
    assert_eq!(view.error.as_deref(), Some("http status 503"));
    assert_eq!(view.total_rows, 2);
    assert_eq!(view.publication_date.as_deref(), Some("31 Dec"));
}

#[test]
fn refresh_is_ignored_while_loading_or_before_startup() {
    init_logging();
    let (_state, effects) = update(AppState::new(), Msg::RefreshClicked);
    assert!(effects.is_empty());

    let (state, _request_id) = started();
    let (_state, effects) = update(state, Msg::RefreshClicked);
    assert!(effects.is_empty());
}

#[test]
fn stale_responses_are_ignored() {
    init_logging();
    let (state, request_id) = started();
    let (state, _) = update(
        state,
        Msg::FeedFetched {
            request_id: request_id + 10,
            text: FEED.to_string(),
            fetched_at: None,
        },
    );
    assert!(state.snapshot().is_none());

    let (state, _) = update(
        state,
        Msg::FeedFailed {
            request_id: request_id + 10,
            message: "boom".to_string(),
        },
    );
    assert!(state.error().is_none());
    assert!(state.view().loading);
}

#[test]
fn successful_refresh_clears_error_and_reselects_by_code() {
    init_logging();
    let state = apply(
        loaded(FEED),
        [
            Msg::CurrencySelected { ordinal: 0 },
            Msg::AmountChanged("252".to_string()),
            Msg::RefreshClicked,
            Msg::FeedFailed {
                request_id: 2,
                message: "timeout".to_string(),
            },
            Msg::RefreshClicked,
            Msg::FeedFetched {
                request_id: 3,
                text: LATER_FEED.to_string(),
                fetched_at: None,
            },
        ],
    );

    let view = state.view();
    assert!(view.error.is_none());
    assert_eq!(view.publication_date.as_deref(), Some("02 Jan"));
    assert_eq!(view.selected_code.as_deref(), Some("EUR"));
    assert_eq!(state.selected_record().map(|r| r.ordinal), Some(1));
    assert_eq!(view.converted.as_deref(), Some("10.08 EUR"));
}

#[test]
fn selection_is_cleared_when_code_disappears() {
    init_logging();
    let state = apply(
        loaded(FEED),
        [
            Msg::CurrencySelected { ordinal: 1 },
            Msg::RefreshClicked,
            Msg::FeedFetched {
                request_id: 2,
                text: "03 Jan\nheader\nEMU|euro|1|EUR|25.0\n".to_string(),
                fetched_at: None,
            },
        ],
    );

    assert!(state.selected_record().is_none());
    assert!(state.view().selected_code.is_none());
}

#[test]
fn conversion_follows_selection_and_amount() {
    init_logging();
    let state = loaded(FEED);
    assert!(state.view().converted.is_none());

    let state = apply(state, [Msg::CurrencySelected { ordinal: 0 }]);
    assert_eq!(state.view().selected_code.as_deref(), Some("EUR"));
    assert!(state.view().converted.is_none());

    let state = apply(state, [Msg::AmountChanged("100".to_string())]);
    let value = state.converted().unwrap();
    assert!((value - 100.0 / 25.2).abs() < 1e-12);
    assert_eq!(
        state.view().converted,
        Some(format!("{} EUR", 100.0 / 25.2))
    );

    let state = apply(state, [Msg::AmountChanged(String::new())]);
    assert!(state.converted().is_none());
    assert!(state.view().converted.is_none());
}

#[test]
fn invalid_amount_is_flagged_and_not_converted() {
    init_logging();
    let state = apply(
        loaded(FEED),
        [
            Msg::CurrencySelected { ordinal: 1 },
            Msg::AmountChanged("12abc".to_string()),
        ],
    );

    let view = state.view();
    assert!(view.amount_invalid);
    assert_eq!(view.amount_text, "12abc");
    assert!(view.converted.is_none());
}

#[test]
fn selecting_unknown_ordinal_is_ignored() {
    init_logging();
    let mut state = loaded(FEED);
    state.consume_dirty();

    let (mut state, effects) = update(state, Msg::CurrencySelected { ordinal: 7 });
    assert!(effects.is_empty());
    assert!(state.selected_record().is_none());
    assert!(!state.consume_dirty());
}

#[test]
fn selecting_before_any_feed_is_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::CurrencySelected { ordinal: 0 });
    assert!(state.selected_record().is_none());
}

#[test]
fn fetch_time_is_shown_after_load() {
    init_logging();
    let (state, request_id) = started();
    assert!(state.view().fetched_at.is_none());

    let (state, _) = update(
        state,
        Msg::FeedFetched {
            request_id,
            text: FEED.to_string(),
            fetched_at: Some("2024-12-31 14:35:02".to_string()),
        },
    );
    assert_eq!(state.view().fetched_at.as_deref(), Some("2024-12-31 14:35:02"));
}
