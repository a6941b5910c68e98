use crate::{AppState, FetchState, RateRecord, ROWS_PER_PAGE_OPTIONS};

pub const APP_TITLE: &str = "CZK Converter";
pub const TABLE_COLUMNS: [&str; 5] = ["country", "currency", "amount", "code", "rate"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub title: &'static str,
    pub publication_date: Option<String>,
    pub fetched_at: Option<String>,
    pub loading: bool,
    pub loading_bytes: Option<u64>,
    pub error: Option<String>,
    pub amount_text: String,
    pub amount_invalid: bool,
    pub options: Vec<CurrencyOption>,
    pub selected_code: Option<String>,
    /// `"{value} {code}"` when a conversion is defined.
    pub converted: Option<String>,
    pub columns: [&'static str; 5],
    pub rows: Vec<RateRowView>,
    pub page: usize,
    pub page_count: usize,
    pub rows_per_page: usize,
    pub rows_per_page_options: [usize; 3],
    pub total_rows: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyOption {
    pub ordinal: usize,
    pub code: String,
}

/// One table row with every column already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRowView {
    pub ordinal: usize,
    pub country: String,
    pub currency: String,
    pub amount: String,
    pub code: String,
    pub rate: String,
}

impl RateRowView {
    pub fn cells(&self) -> [&str; 5] {
        [
            self.country.as_str(),
            self.currency.as_str(),
            self.amount.as_str(),
            self.code.as_str(),
            self.rate.as_str(),
        ]
    }
}

impl From<&RateRecord> for RateRowView {
    fn from(record: &RateRecord) -> Self {
        Self {
            ordinal: record.ordinal,
            country: record.country.clone(),
            currency: record.currency_name.clone(),
            amount: record.unit_amount.to_string(),
            code: record.code.clone(),
            rate: record.rate.to_string(),
        }
    }
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let (loading, loading_bytes) = match state.fetch_state() {
            FetchState::Loading { bytes, .. } => (true, bytes),
            _ => (false, None),
        };

        let records: &[RateRecord] = state
            .snapshot()
            .map(|snapshot| snapshot.records.as_slice())
            .unwrap_or_default();

        let start = state.page() * state.rows_per_page();
        let rows = records
            .iter()
            .skip(start)
            .take(state.rows_per_page())
            .map(RateRowView::from)
            .collect();

        let selected = state.selected_record();
        let converted = selected
            .zip(state.converted())
            .map(|(record, value)| format!("{value} {}", record.code));

        Self {
            title: APP_TITLE,
            publication_date: state
                .snapshot()
                .map(|snapshot| snapshot.publication_date.clone()),
            fetched_at: state.fetched_at().map(ToOwned::to_owned),
            loading,
            loading_bytes,
            error: state.error().map(ToOwned::to_owned),
            amount_text: state.amount().text.clone(),
            amount_invalid: state.amount().invalid,
            options: records
                .iter()
                .map(|record| CurrencyOption {
                    ordinal: record.ordinal,
                    code: record.code.clone(),
                })
                .collect(),
            selected_code: selected.map(|record| record.code.clone()),
            converted,
            columns: TABLE_COLUMNS,
            rows,
            page: state.page(),
            page_count: state.page_count(),
            rows_per_page: state.rows_per_page(),
            rows_per_page_options: ROWS_PER_PAGE_OPTIONS,
            total_rows: records.len(),
            dirty: state.is_dirty(),
        }
    }
}
