//! Per-symbol price series and the symbol-keyed price history.

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Symbol → series. Ordered by symbol so every pass over it is deterministic.
pub type PriceHistory = BTreeMap<String, PriceSeries>;

/// Ascending-date daily bars for one symbol. Immutable input to the
/// indicator engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<OhlcvBar>) -> Self {
        Self { bars }
    }

    /// Number of rows, missing prices included.
    pub fn trading_days(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Non-missing adjusted closes in date order.
    pub fn adj_closes(&self) -> Vec<f64> {
        self.bars.iter().filter_map(|b| b.adj_close).collect()
    }

    /// Non-missing raw closes in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().filter_map(|b| b.close).collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// First adjacent pair whose dates are not strictly increasing.
    pub fn first_unordered(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.bars
            .windows(2)
            .find(|w| w[1].date <= w[0].date)
            .map(|w| (w[0].date, w[1].date))
    }
}

/// Carry the last observed close / adjusted close forward over runs of at
/// most `limit` missing values. Each column is filled independently; the
/// first `limit` entries of a longer run are filled and the rest stay
/// missing. Leading gaps are never filled.
pub fn forward_fill(bars: &mut [OhlcvBar], limit: usize) {
    if limit == 0 {
        return;
    }
    fill_column(bars, limit, |b| &mut b.close);
    fill_column(bars, limit, |b| &mut b.adj_close);
}

fn fill_column<F>(bars: &mut [OhlcvBar], limit: usize, mut column: F)
where
    F: FnMut(&mut OhlcvBar) -> &mut Option<f64>,
{
    let mut last: Option<f64> = None;
    let mut run = 0usize;

    for bar in bars.iter_mut() {
        let cell = column(bar);
        match *cell {
            Some(v) => {
                last = Some(v);
                run = 0;
            }
            None => {
                run += 1;
                if run <= limit {
                    *cell = last;
                }
            }
        }
    }
}
