//! Exponential Moving Average.
//!
//! k = 2/(span+1), seeded at the first observation:
//! EMA[0] = P[0], EMA[i] = P[i]*k + EMA[i-1]*(1-k).
//! No warmup; every point is defined.

pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// EMA at the final observation. `None` for an empty input or zero span.
pub fn last_ema(prices: &[f64], span: usize) -> Option<f64> {
    if span == 0 {
        return None;
    }
    let k = smoothing_factor(span);
    let (&first, rest) = prices.split_first()?;
    Some(rest.iter().fold(first, |ema, &p| p * k + ema * (1.0 - k)))
}
