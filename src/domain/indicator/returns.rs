//! Lookback prices and period returns.
//!
//! Return(n) = (P[last] / P[last-n] - 1) * 100, undefined when the series
//! holds fewer than n+1 prices.

/// Price exactly `n` observations before the latest.
pub fn price_n_ago(prices: &[f64], n: usize) -> Option<f64> {
    if prices.len() < n + 1 {
        return None;
    }
    Some(prices[prices.len() - 1 - n])
}

/// Standard percentage return from `past` to `current`.
pub fn period_return(current: f64, past: Option<f64>) -> Option<f64> {
    past.map(|p| (current / p - 1.0) * 100.0)
}

/// `current / (past - 1) * 100`.
///
/// Kept verbatim as a selectable alternative to [`period_return`]. The
/// denominator subtracts one from the reference price instead of dividing
/// by it, so the result flips sign for reference prices below 1 and grows
/// without bound near 1. Undefined when `past - 1 == 0`.
pub fn unconventional_return(current: f64, past: Option<f64>) -> Option<f64> {
    let denominator = past? - 1.0;
    if denominator == 0.0 {
        return None;
    }
    Some(current / denominator * 100.0)
}
