//! Trailing-window statistics: period high and up-day percentage.

/// Maximum of the last `window` prices, or of the whole slice when it is
/// shorter than `window`.
pub fn trailing_high(prices: &[f64], window: usize) -> Option<f64> {
    let start = prices.len().saturating_sub(window);
    prices[start..].iter().copied().reduce(f64::max)
}

/// Share of strict day-over-day increases across the last `window` closes,
/// as a percentage of the `window - 1` adjacent pairs.
///
/// `None` when fewer than `window` closes exist or `window < 2`.
pub fn up_days_pct(closes: &[f64], window: usize) -> Option<f64> {
    if window < 2 || closes.len() < window {
        return None;
    }
    let tail = &closes[closes.len() - window..];
    let up = tail.windows(2).filter(|w| w[1] > w[0]).count();
    Some(up as f64 / (window - 1) as f64 * 100.0)
}
