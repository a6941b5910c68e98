use crate::RateRecord;

/// What the user has chosen so far: a currency and a CZK quantity, each optional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConversionInput<'a> {
    pub record: Option<&'a RateRecord>,
    pub quantity: Option<f64>,
}

/// Converted amount in the selected currency, absent when it cannot be computed.
pub type ConversionResult = Option<f64>;

/// Convert a CZK quantity into the selected currency.
///
/// Returns `None` when either input is missing or the record quotes a zero rate.
/// The quotient is returned as-is, without rounding.
pub fn convert(input: &ConversionInput<'_>) -> ConversionResult {
    let record = input.record?;
    let quantity = input.quantity?;
    if record.rate == 0.0 {
        return None;
    }
    Some(quantity * record.unit_amount / record.rate)
}
