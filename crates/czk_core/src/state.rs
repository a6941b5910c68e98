use crate::convert::{convert, ConversionInput, ConversionResult};
use crate::feed::{parse_feed, FeedSnapshot, RateRecord};
use crate::view_model::AppViewModel;

pub type RequestId = u64;

/// Daily fixing published by the Czech National Bank.
pub const DEFAULT_FEED_URL: &str = "https://www.cnb.cz/en/financial-markets/foreign-exchange-market/central-bank-exchange-rate-fixing/central-bank-exchange-rate-fixing/daily.txt";
pub const DEFAULT_ROWS_PER_PAGE: usize = 16;
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [10, 25, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    NotStarted,
    Loading {
        request_id: RequestId,
        bytes: Option<u64>,
    },
    Loaded,
    Failed,
}

/// Raw amount text as typed, plus its parsed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AmountInput {
    pub text: String,
    pub value: Option<f64>,
    pub invalid: bool,
}

impl AmountInput {
    fn parse(text: String) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self {
                text,
                value: None,
                invalid: false,
            };
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Self {
                text,
                value: Some(value),
                invalid: false,
            },
            _ => Self {
                text,
                value: None,
                invalid: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    feed_url: String,
    fetch: FetchState,
    next_request_id: RequestId,
    snapshot: Option<FeedSnapshot>,
    fetched_at: Option<String>,
    error: Option<String>,
    amount: AmountInput,
    selected: Option<usize>,
    page: usize,
    rows_per_page: usize,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            fetch: FetchState::NotStarted,
            next_request_id: 1,
            snapshot: None,
            fetched_at: None,
            error: None,
            amount: AmountInput::default(),
            selected: None,
            page: 0,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = url.into();
        self
    }

    /// Zero is ignored and keeps the default.
    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        if rows_per_page > 0 {
            self.rows_per_page = rows_per_page;
        }
        self
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetch
    }

    pub fn snapshot(&self) -> Option<&FeedSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn fetched_at(&self) -> Option<&str> {
        self.fetched_at.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn amount(&self) -> &AmountInput {
        &self.amount
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn record_count(&self) -> usize {
        self.snapshot.as_ref().map_or(0, FeedSnapshot::len)
    }

    /// Always at least one page, so an empty table still has page 0.
    pub fn page_count(&self) -> usize {
        self.record_count().div_ceil(self.rows_per_page).max(1)
    }

    pub fn selected_record(&self) -> Option<&RateRecord> {
        let ordinal = self.selected?;
        self.snapshot.as_ref()?.get(ordinal)
    }

    pub fn conversion_input(&self) -> ConversionInput<'_> {
        ConversionInput {
            record: self.selected_record(),
            quantity: self.amount.value,
        }
    }

    pub fn converted(&self) -> ConversionResult {
        convert(&self.conversion_input())
    }

    /// Returns whether the view changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Move into `Loading` with a fresh request id.
    pub(crate) fn begin_fetch(&mut self) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.fetch = FetchState::Loading {
            request_id,
            bytes: None,
        };
        self.mark_dirty();
        request_id
    }

    fn is_current_request(&self, request_id: RequestId) -> bool {
        matches!(
            self.fetch,
            FetchState::Loading { request_id: current, .. } if current == request_id
        )
    }

    pub(crate) fn apply_progress(&mut self, request_id: RequestId, bytes: u64) {
        if !self.is_current_request(request_id) {
            return;
        }
        self.fetch = FetchState::Loading {
            request_id,
            bytes: Some(bytes),
        };
        self.mark_dirty();
    }

    /// Replace the snapshot wholesale with a parse of `text`.
    pub(crate) fn apply_feed(
        &mut self,
        request_id: RequestId,
        text: &str,
        fetched_at: Option<String>,
    ) {
        if !self.is_current_request(request_id) {
            return;
        }
        let snapshot = parse_feed(text);

        let previous_code = self.selected_record().map(|record| record.code.clone());
        self.selected = previous_code
            .and_then(|code| snapshot.find_by_code(&code))
            .map(|record| record.ordinal);

        self.snapshot = Some(snapshot);
        self.fetched_at = fetched_at;
        self.fetch = FetchState::Loaded;
        self.error = None;
        self.page = self.page.min(self.page_count() - 1);
        self.mark_dirty();
    }

    /// Record a failure; any earlier snapshot stays in place.
    pub(crate) fn apply_failure(&mut self, request_id: RequestId, message: String) {
        if !self.is_current_request(request_id) {
            return;
        }
        self.fetch = FetchState::Failed;
        self.error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn set_amount(&mut self, text: String) {
        let amount = AmountInput::parse(text);
        if amount != self.amount {
            self.amount = amount;
            self.mark_dirty();
        }
    }

    pub(crate) fn select(&mut self, ordinal: usize) {
        let exists = self
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.get(ordinal).is_some());
        if exists && self.selected != Some(ordinal) {
            self.selected = Some(ordinal);
            self.mark_dirty();
        }
    }

    pub(crate) fn set_page(&mut self, page: usize) {
        if page < self.page_count() && page != self.page {
            self.page = page;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_rows_per_page(&mut self, rows_per_page: usize) {
        if rows_per_page == 0 {
            return;
        }
        if rows_per_page != self.rows_per_page || self.page != 0 {
            self.rows_per_page = rows_per_page;
            self.page = 0;
            self.mark_dirty();
        }
    }
}
