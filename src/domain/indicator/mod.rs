//! Indicator engine: one price series in, one [`IndicatorRecord`] out.
//!
//! All prices come from the adjusted close except the up-day count, which
//! uses the raw close. Missing cells are dropped before any arithmetic.

pub mod ema;
pub mod returns;
pub mod window;

use crate::domain::price_series::{PriceHistory, PriceSeries};
use chrono::NaiveDate;
use rayon::prelude::*;

pub const MIN_TRADING_DAYS: usize = 300;
pub const TRADING_DAYS_6M: usize = 126;
pub const TRADING_DAYS_9M: usize = 189;
pub const TRADING_DAYS_12M: usize = 252;
pub const EMA_SHORT_SPAN: usize = 100;
pub const EMA_LONG_SPAN: usize = 200;
pub const PROXIMITY_TO_HIGH_THRESHOLD: f64 = 0.75;

pub const INSUFFICIENT_DATA_REASON: &str = "Insufficient data (< 300 trading days)";

/// Per-symbol computation failure. Folded into the symbol's record, never
/// propagated to the batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("dates not strictly increasing ({previous} followed by {next})")]
    UnorderedDates { previous: NaiveDate, next: NaiveDate },

    #[error("non-positive adjusted close {value} {lookback} trading days before the latest")]
    NonPositiveReference { lookback: usize, value: f64 },

    #[error("non-finite {column} on {date}")]
    NonFinite {
        column: &'static str,
        date: NaiveDate,
    },
}

/// Scalar metrics for a symbol with enough history.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicators {
    pub current_price: f64,
    pub ema100: f64,
    pub ema200: f64,
    pub high_52w: f64,
    pub proximity_flag: bool,
    pub up_days_pct_6m: Option<f64>,
    pub price_6m_ago: Option<f64>,
    pub price_9m_ago: Option<f64>,
    pub price_12m_ago: Option<f64>,
    pub return_6m: Option<f64>,
    pub return_9m: Option<f64>,
    pub return_12m: Option<f64>,
    pub one_year_return_standard: Option<f64>,
    pub one_year_return_unconventional: Option<f64>,
}

/// Indicator output for one symbol. `metrics` is `None` exactly when the
/// symbol had insufficient data or failed to compute; `rejection_reasons`
/// then says which.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRecord {
    pub symbol: String,
    pub trading_days: usize,
    pub metrics: Option<Indicators>,
    pub rejection_reasons: String,
}

impl IndicatorRecord {
    pub fn data_sufficient(&self) -> bool {
        self.metrics.is_some()
    }

    fn insufficient(symbol: &str, trading_days: usize, reason: String) -> Self {
        Self {
            symbol: symbol.to_string(),
            trading_days,
            metrics: None,
            rejection_reasons: reason,
        }
    }
}

/// How [`compute_indicators_with`] schedules the per-symbol work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    #[default]
    Parallel,
    Sequential,
}

/// One record per symbol, in symbol order, computed in parallel.
pub fn compute_indicators(history: &PriceHistory) -> Vec<IndicatorRecord> {
    compute_indicators_with(history, Parallelism::Parallel)
}

pub fn compute_indicators_with(
    history: &PriceHistory,
    parallelism: Parallelism,
) -> Vec<IndicatorRecord> {
    let entries: Vec<(&String, &PriceSeries)> = history.iter().collect();

    match parallelism {
        Parallelism::Parallel => entries
            .par_iter()
            .map(|(symbol, series)| compute_symbol(symbol, series))
            .collect(),
        Parallelism::Sequential => entries
            .iter()
            .map(|(symbol, series)| compute_symbol(symbol, series))
            .collect(),
    }
}

/// Indicator record for a single symbol. Never fails: insufficient history
/// and malformed input both come back as a record without metrics.
pub fn compute_symbol(symbol: &str, series: &PriceSeries) -> IndicatorRecord {
    let trading_days = series.trading_days();
    let adj = series.adj_closes();

    if trading_days < MIN_TRADING_DAYS || adj.len() < MIN_TRADING_DAYS {
        return IndicatorRecord::insufficient(
            symbol,
            trading_days,
            INSUFFICIENT_DATA_REASON.to_string(),
        );
    }

    match calculate_indicators(series, &adj) {
        Ok(metrics) => IndicatorRecord {
            symbol: symbol.to_string(),
            trading_days,
            metrics: Some(metrics),
            rejection_reasons: String::new(),
        },
        Err(e) => IndicatorRecord::insufficient(symbol, trading_days, format!("Error: {e}")),
    }
}

fn check_series(series: &PriceSeries) -> Result<(), IndicatorError> {
    if let Some((previous, next)) = series.first_unordered() {
        return Err(IndicatorError::UnorderedDates { previous, next });
    }
    for bar in &series.bars {
        if let Some(value) = bar.adj_close {
            if !value.is_finite() {
                return Err(IndicatorError::NonFinite {
                    column: "adjusted close",
                    date: bar.date,
                });
            }
        }
        if bar.close.is_some_and(|c| !c.is_finite()) {
            return Err(IndicatorError::NonFinite {
                column: "close",
                date: bar.date,
            });
        }
    }
    Ok(())
}

/// Lookback price that a return divides by. Zero or negative values
/// elsewhere in the series are left alone.
fn reference_price(adj: &[f64], lookback: usize) -> Result<Option<f64>, IndicatorError> {
    match returns::price_n_ago(adj, lookback) {
        Some(value) if value <= 0.0 => Err(IndicatorError::NonPositiveReference { lookback, value }),
        price => Ok(price),
    }
}

fn calculate_indicators(series: &PriceSeries, adj: &[f64]) -> Result<Indicators, IndicatorError> {
    check_series(series)?;

    // Non-empty: the caller has already required MIN_TRADING_DAYS prices.
    let current_price = adj[adj.len() - 1];

    let ema100 = ema::last_ema(adj, EMA_SHORT_SPAN).unwrap_or(current_price);
    let ema200 = ema::last_ema(adj, EMA_LONG_SPAN).unwrap_or(current_price);
    let high_52w = window::trailing_high(adj, TRADING_DAYS_12M).unwrap_or(current_price);
    let proximity_flag = current_price >= PROXIMITY_TO_HIGH_THRESHOLD * high_52w;

    let up_days_pct_6m = window::up_days_pct(&series.closes(), TRADING_DAYS_6M);

    let price_6m_ago = reference_price(adj, TRADING_DAYS_6M)?;
    let price_9m_ago = reference_price(adj, TRADING_DAYS_9M)?;
    let price_12m_ago = reference_price(adj, TRADING_DAYS_12M)?;

    let return_6m = returns::period_return(current_price, price_6m_ago);
    let return_9m = returns::period_return(current_price, price_9m_ago);
    let return_12m = returns::period_return(current_price, price_12m_ago);

    Ok(Indicators {
        current_price,
        ema100,
        ema200,
        high_52w,
        proximity_flag,
        up_days_pct_6m,
        price_6m_ago,
        price_9m_ago,
        price_12m_ago,
        return_6m,
        return_9m,
        return_12m,
        one_year_return_standard: return_12m,
        one_year_return_unconventional: returns::unconventional_return(current_price, price_12m_ago),
    })
}
