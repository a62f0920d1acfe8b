//! Momentum ranking of the gate-passing shortlist.
//!
//! rank = 1 + number of peers with a strictly greater return, so ties share
//! the lower rank number. final_rank = rank_6m + rank_12m. rank_9m is
//! reported but carries no weight and never affects order.
//!
//! Order: final_rank ascending, then return_12m descending, then return_6m
//! descending, then input order.
//!
//! Ranks are computed over the whole input before truncating to `top_n`.
//! Ranking an output again reproduces it only when nothing was truncated:
//! once records are dropped the survivors are re-ranked among themselves,
//! and their order can change.

use crate::domain::error::ScreenerError;
use crate::domain::gate::GateResult;
use std::cmp::Ordering;

pub const DEFAULT_TOP_N: usize = 45;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecord {
    pub result: GateResult,
    pub rank_6m: usize,
    pub rank_9m: usize,
    pub rank_12m: usize,
    pub final_rank: usize,
}

impl RankedRecord {
    pub fn symbol(&self) -> &str {
        self.result.symbol()
    }
}

// Undefined returns rank below every defined one and tie with each other.
fn rank_key(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NEG_INFINITY)
}

/// Competition ranks for `values`, best (largest) first.
pub fn competition_ranks(values: &[Option<f64>]) -> Vec<usize> {
    let mut sorted: Vec<f64> = values.iter().map(|v| rank_key(*v)).collect();
    sorted.sort_by(|a, b| b.total_cmp(a));

    values
        .iter()
        .map(|v| {
            let key = rank_key(*v);
            1 + sorted.partition_point(|&x| x > key)
        })
        .collect()
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    rank_key(b).total_cmp(&rank_key(a))
}

/// Rank `passing` and keep the best `top_n`. Callers pass the passing set of
/// a [`GateOutcome`](crate::domain::gate::GateOutcome).
pub fn rank_and_select(
    passing: &[GateResult],
    top_n: usize,
) -> Result<Vec<RankedRecord>, ScreenerError> {
    if top_n < 1 {
        return Err(ScreenerError::InvalidTopN(top_n));
    }
    if passing.is_empty() {
        return Ok(Vec::new());
    }

    let r6: Vec<_> = passing.iter().map(GateResult::return_6m).collect();
    let r9: Vec<_> = passing.iter().map(GateResult::return_9m).collect();
    let r12: Vec<_> = passing.iter().map(GateResult::return_12m).collect();

    let rank_6m = competition_ranks(&r6);
    let rank_9m = competition_ranks(&r9);
    let rank_12m = competition_ranks(&r12);

    let mut ranked: Vec<RankedRecord> = passing
        .iter()
        .enumerate()
        .map(|(i, result)| RankedRecord {
            result: result.clone(),
            rank_6m: rank_6m[i],
            rank_9m: rank_9m[i],
            rank_12m: rank_12m[i],
            final_rank: rank_6m[i] + rank_12m[i],
        })
        .collect();

    // Stable: remaining ties keep input order.
    ranked.sort_by(|a, b| {
        a.final_rank
            .cmp(&b.final_rank)
            .then_with(|| descending(a.result.return_12m(), b.result.return_12m()))
            .then_with(|| descending(a.result.return_6m(), b.result.return_6m()))
    });
    ranked.truncate(top_n);

    Ok(ranked)
}
