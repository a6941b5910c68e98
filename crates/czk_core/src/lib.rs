//! Converter core: feed parsing, conversion, and the pure state machine behind the UI.
mod convert;
mod effect;
mod feed;
mod msg;
mod state;
mod update;
mod view_model;

pub use convert::{convert, ConversionInput, ConversionResult};
pub use effect::Effect;
pub use feed::{parse_feed, FeedSnapshot, RateRecord};
pub use msg::Msg;
pub use state::{
    AmountInput, AppState, FetchState, RequestId, DEFAULT_FEED_URL, DEFAULT_ROWS_PER_PAGE,
    ROWS_PER_PAGE_OPTIONS,
};
pub use update::update;
pub use view_model::{AppViewModel, CurrencyOption, RateRowView, APP_TITLE, TABLE_COLUMNS};
