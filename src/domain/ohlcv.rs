//! Daily OHLCV bar representation.

use chrono::NaiveDate;

/// One trading day of price history.
///
/// `close` and `adj_close` are optional: the provider may leave either cell
/// blank, and the indicator engine skips missing observations rather than
/// treating them as a number.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: i64,
}

impl OhlcvBar {
    /// Bar with every price set to `price`.
    pub fn flat(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            open: price,
            high: price,
            low: price,
            close: Some(price),
            adj_close: Some(price),
            volume: 0,
        }
    }
}
