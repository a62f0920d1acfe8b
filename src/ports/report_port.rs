//! Report generation port trait.

use crate::domain::error::ScreenerError;
use crate::domain::screen::ScreenReport;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Port for persisting screen results.
pub trait ReportPort {
    /// Write `report` for the universe `label` as of `as_of`. Returns the
    /// paths written.
    fn write(
        &self,
        report: &ScreenReport,
        label: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<PathBuf>, ScreenerError>;
}
