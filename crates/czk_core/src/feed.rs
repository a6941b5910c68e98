//! Parser for the daily exchange-rate text feed.
//!
//! The feed looks like:
//!
//! ```text
//! 31 Dec 2024 #251
//! Country|Currency|Amount|Code|Rate
//! Australia|dollar|1|AUD|15.045
//! EMU|euro|1|EUR|25.185
//! ```

const FIELD_DELIMITER: char = '|';
const FIELD_COUNT: usize = 5;
/// Lines before the first data row: the publication date and the column header.
const PREAMBLE_LINES: usize = 2;

/// One currency row of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    /// Dense zero-based index among the accepted rows of one parse.
    pub ordinal: usize,
    pub country: String,
    pub currency_name: String,
    /// Number of foreign units the rate is quoted for (1, 100, 1000...).
    pub unit_amount: f64,
    pub code: String,
    /// CZK price of `unit_amount` units of the currency.
    pub rate: f64,
}

/// Immutable result of parsing one fetched feed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedSnapshot {
    pub publication_date: String,
    pub records: Vec<RateRecord>,
}

impl FeedSnapshot {
    pub fn get(&self, ordinal: usize) -> Option<&RateRecord> {
        self.records.get(ordinal)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&RateRecord> {
        let code = code.trim();
        self.records
            .iter()
            .find(|record| record.code.eq_ignore_ascii_case(code))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse raw feed text into a snapshot.
///
/// Line 0 is kept verbatim as the publication date and line 1 (the header)
/// is skipped. Every later line must hold exactly five non-empty
/// pipe-separated fields with numeric amount and rate; anything else is
/// dropped without error. Ordinals are dense over the accepted rows.
pub fn parse_feed(raw: &str) -> FeedSnapshot {
    let mut lines = raw.split('\n').map(strip_carriage_return);
    let publication_date = lines.next().unwrap_or_default().to_string();

    let records = lines
        .skip(PREAMBLE_LINES - 1)
        .filter_map(parse_row)
        .enumerate()
        .map(|(ordinal, row)| RateRecord { ordinal, ..row })
        .collect();

    FeedSnapshot {
        publication_date,
        records,
    }
}

fn strip_carriage_return(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn parse_row(line: &str) -> Option<RateRecord> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != FIELD_COUNT || fields.iter().any(|field| field.is_empty()) {
        return None;
    }

    let [country, currency_name, amount, code, rate] = fields.as_slice() else {
        return None;
    };

    Some(RateRecord {
        ordinal: 0,
        country: (*country).to_string(),
        currency_name: (*currency_name).to_string(),
        unit_amount: parse_number(amount)?,
        code: (*code).to_string(),
        rate: parse_number(rate)?,
    })
}

fn parse_number(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
