#![allow(dead_code)]

use chrono::NaiveDate;
use momentum_screener::domain::error::ScreenerError;
pub use momentum_screener::domain::ohlcv::OhlcvBar;
pub use momentum_screener::domain::price_series::{PriceHistory, PriceSeries};
use momentum_screener::ports::data_port::DataPort;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, series: PriceSeries) -> Self {
        self.data.insert(symbol.to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, ScreenerError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScreenerError::Data {
                reason: reason.clone(),
            });
        }
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| ScreenerError::Data {
                reason: format!("no file for {}", symbol),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScreenerError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 3).unwrap()
}

/// Linear trend with a small dip every third bar, so roughly two thirds of
/// the days close up when `step` is positive.
pub fn trending(count: usize, start: f64, step: f64) -> PriceSeries {
    PriceSeries::new(
        (0..count)
            .map(|i| {
                let wobble = if i % 3 == 2 { -0.3 } else { 0.0 };
                let price = start + step * i as f64 + wobble;
                OhlcvBar::flat(start_date() + chrono::Duration::days(i as i64), price)
            })
            .collect(),
    )
}

/// Two strong uptrends, one downtrend, one short history.
pub fn sample_history() -> PriceHistory {
    let mut h = PriceHistory::new();
    h.insert("UP_FAST".into(), trending(400, 50.0, 0.5));
    h.insert("UP_SLOW".into(), trending(400, 50.0, 0.2));
    h.insert("DOWN".into(), trending(400, 200.0, -0.3));
    h.insert("SHORT".into(), trending(120, 50.0, 0.5));
    h
}

pub fn mock_from_history(history: &PriceHistory) -> MockDataPort {
    history
        .iter()
        .fold(MockDataPort::new(), |port, (symbol, series)| {
            port.with_series(symbol, series.clone())
        })
}

/// Write `series` as `<dir>/<symbol>.csv` in the price file layout.
pub fn write_price_csv(dir: &Path, symbol: &str, series: &PriceSeries) {
    let mut content = String::from("date,open,high,low,close,adj_close,volume\n");
    for b in &series.bars {
        let cell = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        writeln!(
            content,
            "{},{},{},{},{},{},{}",
            b.date.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            cell(b.close),
            cell(b.adj_close),
            b.volume
        )
        .unwrap();
    }
    std::fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}
