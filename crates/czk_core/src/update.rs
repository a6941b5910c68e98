use crate::{AppState, Effect, FetchState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Startup => {
            // The initial fetch fires once per state lifetime; repeats are ignored.
            if state.fetch_state() == FetchState::NotStarted {
                vec![fetch_feed(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::RefreshClicked => match state.fetch_state() {
            FetchState::Loaded | FetchState::Failed => vec![fetch_feed(&mut state)],
            FetchState::NotStarted | FetchState::Loading { .. } => Vec::new(),
        },
        Msg::FetchProgress { request_id, bytes } => {
            state.apply_progress(request_id, bytes);
            Vec::new()
        }
        Msg::FeedFetched {
            request_id,
            text,
            fetched_at,
        } => {
            state.apply_feed(request_id, &text, fetched_at);
            Vec::new()
        }
        Msg::FeedFailed {
            request_id,
            message,
        } => {
            state.apply_failure(request_id, message);
            Vec::new()
        }
        Msg::AmountChanged(text) => {
            state.set_amount(text);
            Vec::new()
        }
        Msg::CurrencySelected { ordinal } => {
            state.select(ordinal);
            Vec::new()
        }
        Msg::PageChanged(page) => {
            state.set_page(page);
            Vec::new()
        }
        Msg::RowsPerPageChanged(rows_per_page) => {
            state.set_rows_per_page(rows_per_page);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn fetch_feed(state: &mut AppState) -> Effect {
    let request_id = state.begin_fetch();
    Effect::FetchFeed {
        request_id,
        url: state.feed_url().to_string(),
    }
}
