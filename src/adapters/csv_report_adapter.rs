//! CSV report adapter.
//!
//! Writes two files per run into the output directory:
//! `screener_all_<label>_<YYYYMMDD>.csv` with every gated record and
//! `screener_top_<label>_<YYYYMMDD>.csv` with the ranked shortlist.
//! Undefined values are written as empty cells.

use crate::domain::error::ScreenerError;
use crate::domain::gate::GateResult;
use crate::domain::indicator::Indicators;
use crate::domain::rank::RankedRecord;
use crate::domain::screen::ScreenReport;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

// csv rows must be flat structs; both row types copy from these cells.
struct MetricCells {
    current_price: Option<f64>,
    ema100: Option<f64>,
    ema200: Option<f64>,
    high_52w: Option<f64>,
    proximity_to_high: Option<bool>,
    up_days_pct_6m: Option<f64>,
    price_6m_ago: Option<f64>,
    price_9m_ago: Option<f64>,
    price_12m_ago: Option<f64>,
    return_6m: Option<f64>,
    return_9m: Option<f64>,
    return_12m: Option<f64>,
    one_year_return_standard: Option<f64>,
    one_year_return_unconventional: Option<f64>,
}

impl MetricCells {
    fn from_metrics(m: Option<&Indicators>) -> Self {
        Self {
            current_price: m.map(|m| m.current_price),
            ema100: m.map(|m| m.ema100),
            ema200: m.map(|m| m.ema200),
            high_52w: m.map(|m| m.high_52w),
            proximity_to_high: m.map(|m| m.proximity_flag),
            up_days_pct_6m: m.and_then(|m| m.up_days_pct_6m),
            price_6m_ago: m.and_then(|m| m.price_6m_ago),
            price_9m_ago: m.and_then(|m| m.price_9m_ago),
            price_12m_ago: m.and_then(|m| m.price_12m_ago),
            return_6m: m.and_then(|m| m.return_6m),
            return_9m: m.and_then(|m| m.return_9m),
            return_12m: m.and_then(|m| m.return_12m),
            one_year_return_standard: m.and_then(|m| m.one_year_return_standard),
            one_year_return_unconventional: m.and_then(|m| m.one_year_return_unconventional),
        }
    }
}

#[derive(Debug, Serialize)]
struct AllRow<'a> {
    symbol: &'a str,
    trading_days: usize,
    data_sufficient: bool,
    current_price: Option<f64>,
    ema100: Option<f64>,
    ema200: Option<f64>,
    high_52w: Option<f64>,
    proximity_to_high: Option<bool>,
    up_days_pct_6m: Option<f64>,
    price_6m_ago: Option<f64>,
    price_9m_ago: Option<f64>,
    price_12m_ago: Option<f64>,
    return_6m: Option<f64>,
    return_9m: Option<f64>,
    return_12m: Option<f64>,
    one_year_return_standard: Option<f64>,
    one_year_return_unconventional: Option<f64>,
    trend_gate: bool,
    proximity_gate: bool,
    consistency_gate: bool,
    performance_gate: bool,
    gate_pass: bool,
    rejection_reasons: &'a str,
}

impl<'a> From<&'a GateResult> for AllRow<'a> {
    fn from(r: &'a GateResult) -> Self {
        let m = MetricCells::from_metrics(r.metrics());
        Self {
            symbol: r.symbol(),
            trading_days: r.record.trading_days,
            data_sufficient: r.data_sufficient(),
            current_price: m.current_price,
            ema100: m.ema100,
            ema200: m.ema200,
            high_52w: m.high_52w,
            proximity_to_high: m.proximity_to_high,
            up_days_pct_6m: m.up_days_pct_6m,
            price_6m_ago: m.price_6m_ago,
            price_9m_ago: m.price_9m_ago,
            price_12m_ago: m.price_12m_ago,
            return_6m: m.return_6m,
            return_9m: m.return_9m,
            return_12m: m.return_12m,
            one_year_return_standard: m.one_year_return_standard,
            one_year_return_unconventional: m.one_year_return_unconventional,
            trend_gate: r.gates.trend,
            proximity_gate: r.gates.proximity,
            consistency_gate: r.gates.consistency,
            performance_gate: r.gates.performance,
            gate_pass: r.gate_pass,
            rejection_reasons: &r.rejection_reasons,
        }
    }
}

#[derive(Debug, Serialize)]
struct TopRow<'a> {
    position: usize,
    symbol: &'a str,
    final_rank: usize,
    rank_6m: usize,
    rank_9m: usize,
    rank_12m: usize,
    current_price: Option<f64>,
    ema100: Option<f64>,
    ema200: Option<f64>,
    high_52w: Option<f64>,
    up_days_pct_6m: Option<f64>,
    return_6m: Option<f64>,
    return_9m: Option<f64>,
    return_12m: Option<f64>,
    one_year_return_standard: Option<f64>,
    one_year_return_unconventional: Option<f64>,
}

impl<'a> TopRow<'a> {
    fn new(position: usize, r: &'a RankedRecord) -> Self {
        let m = MetricCells::from_metrics(r.result.metrics());
        Self {
            position,
            symbol: r.symbol(),
            final_rank: r.final_rank,
            rank_6m: r.rank_6m,
            rank_9m: r.rank_9m,
            rank_12m: r.rank_12m,
            current_price: m.current_price,
            ema100: m.ema100,
            ema200: m.ema200,
            high_52w: m.high_52w,
            up_days_pct_6m: m.up_days_pct_6m,
            return_6m: m.return_6m,
            return_9m: m.return_9m,
            return_12m: m.return_12m,
            one_year_return_standard: m.one_year_return_standard,
            one_year_return_unconventional: m.one_year_return_unconventional,
        }
    }
}

pub struct CsvReportAdapter {
    output_dir: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn all_path(&self, label: &str, as_of: NaiveDate) -> PathBuf {
        self.output_dir
            .join(format!("screener_all_{}_{}.csv", label, as_of.format("%Y%m%d")))
    }

    pub fn top_path(&self, label: &str, as_of: NaiveDate) -> PathBuf {
        self.output_dir
            .join(format!("screener_top_{}_{}.csv", label, as_of.format("%Y%m%d")))
    }
}

fn report_error(path: &Path, e: impl std::fmt::Display) -> ScreenerError {
    ScreenerError::Report {
        reason: format!("failed to write {}: {}", path.display(), e),
    }
}

fn write_rows<T: Serialize>(
    path: &Path,
    rows: impl IntoIterator<Item = T>,
) -> Result<(), ScreenerError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| report_error(path, e))?;
    for row in rows {
        wtr.serialize(row).map_err(|e| report_error(path, e))?;
    }
    wtr.flush().map_err(|e| report_error(path, e))?;
    Ok(())
}

fn top_rows(top: &[RankedRecord]) -> impl Iterator<Item = TopRow<'_>> {
    top.iter().enumerate().map(|(i, r)| TopRow::new(i + 1, r))
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        report: &ScreenReport,
        label: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<PathBuf>, ScreenerError> {
        fs::create_dir_all(&self.output_dir)?;

        let all_path = self.all_path(label, as_of);
        write_rows(&all_path, report.all.iter().map(AllRow::from))?;
        info!("wrote {} records to {}", report.all.len(), all_path.display());

        let top_path = self.top_path(label, as_of);
        write_rows(&top_path, top_rows(&report.top))?;
        info!("wrote top {} to {}", report.top.len(), top_path.display());

        Ok(vec![all_path, top_path])
    }
}
