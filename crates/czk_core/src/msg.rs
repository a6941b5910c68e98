#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Application finished starting up; triggers the initial feed fetch once.
    Startup,
    /// User asked to fetch the feed again.
    RefreshClicked,
    /// Engine progress for an in-flight fetch.
    FetchProgress {
        request_id: crate::RequestId,
        bytes: u64,
    },
    /// Engine delivered the decoded feed body.
    FeedFetched {
        request_id: crate::RequestId,
        text: String,
        /// Wall-clock time of arrival, formatted by the caller.
        fetched_at: Option<String>,
    },
    /// Engine failed to fetch or decode the feed.
    FeedFailed {
        request_id: crate::RequestId,
        message: String,
    },
    /// User edited the CZK amount (raw text, may be empty).
    AmountChanged(String),
    /// User picked a currency by its ordinal in the current snapshot.
    CurrencySelected { ordinal: usize },
    /// User moved to another table page (zero-based).
    PageChanged(usize),
    /// User changed the number of table rows per page.
    RowsPerPageChanged(usize),
    /// Nothing to do, e.g. an empty input line.
    NoOp,
}
