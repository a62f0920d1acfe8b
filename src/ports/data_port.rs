//! Data access port trait.

use crate::domain::error::ScreenerError;
use crate::domain::price_series::{PriceHistory, PriceSeries};
use chrono::NaiveDate;

/// Symbols that could not be loaded, with the reason.
pub type FetchFailures = Vec<(String, ScreenerError)>;

pub trait DataPort {
    /// Daily bars for `symbol` in ascending date order.
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, ScreenerError>;

    fn list_symbols(&self) -> Result<Vec<String>, ScreenerError>;

    /// First date, last date and bar count, or `None` for an empty series.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ScreenerError> {
        let series = self.fetch_series(symbol)?;
        Ok(series
            .date_range()
            .map(|(first, last)| (first, last, series.trading_days())))
    }

    /// Load every symbol it can. A symbol that fails or has no bars is
    /// left out of the history; failures are returned alongside.
    fn fetch_history(&self, symbols: &[String]) -> (PriceHistory, FetchFailures) {
        let mut history = PriceHistory::new();
        let mut failures = Vec::new();

        for symbol in symbols {
            match self.fetch_series(symbol) {
                Ok(series) if series.is_empty() => failures.push((
                    symbol.clone(),
                    ScreenerError::Data {
                        reason: format!("no bars for {}", symbol),
                    },
                )),
                Ok(series) => {
                    history.insert(symbol.clone(), series);
                }
                Err(e) => failures.push((symbol.clone(), e)),
            }
        }

        (history, failures)
    }
}
