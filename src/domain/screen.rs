//! Full screen run: indicators, gates, ranking.
//!
//! ScreenConfig holds the only knobs the pipeline reads; nothing is taken
//! from global state.

use crate::domain::error::ScreenerError;
use crate::domain::gate::{apply_gatekeeper, GateResult, RejectionBreakdown, ReturnFormula};
use crate::domain::indicator::{compute_indicators_with, Parallelism};
use crate::domain::price_series::PriceHistory;
use crate::domain::rank::{rank_and_select, RankedRecord, DEFAULT_TOP_N};

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    pub top_n: usize,
    pub formula: ReturnFormula,
    pub parallelism: Parallelism,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            formula: ReturnFormula::default(),
            parallelism: Parallelism::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenSummary {
    pub evaluated: usize,
    pub passed: usize,
    pub selected: usize,
    pub rejected: usize,
    pub breakdown: RejectionBreakdown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenReport {
    /// Every gated record, passing and failing, sorted by symbol.
    pub all: Vec<GateResult>,
    /// Ranked shortlist, best first.
    pub top: Vec<RankedRecord>,
    pub summary: ScreenSummary,
}

pub fn run_screen(
    history: &PriceHistory,
    config: &ScreenConfig,
) -> Result<ScreenReport, ScreenerError> {
    if config.top_n < 1 {
        return Err(ScreenerError::InvalidTopN(config.top_n));
    }

    let records = compute_indicators_with(history, config.parallelism);
    let outcome = apply_gatekeeper(&records, config.formula);
    let top = rank_and_select(&outcome.passing, config.top_n)?;

    let summary = ScreenSummary {
        evaluated: records.len(),
        passed: outcome.passing.len(),
        selected: top.len(),
        rejected: outcome.failing.len(),
        breakdown: outcome.breakdown,
    };

    let mut all = outcome.passing;
    all.extend(outcome.failing);
    all.sort_by(|a, b| a.symbol().cmp(b.symbol()));

    Ok(ScreenReport { all, top, summary })
}
