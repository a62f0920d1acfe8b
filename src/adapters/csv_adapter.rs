//! CSV file data adapter.
//!
//! One file per symbol, `<SYMBOL>.csv`, with a header row. Column names
//! follow either the snake_case layout (`date,open,high,low,close,adj_close,volume`)
//! or the provider export layout (`Date,Open,High,Low,Close,Adj Close,Volume`).
//! Blank price cells are missing observations.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::{forward_fill, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Open", default)]
    open: Option<f64>,
    #[serde(alias = "High", default)]
    high: Option<f64>,
    #[serde(alias = "Low", default)]
    low: Option<f64>,
    #[serde(alias = "Close", default)]
    close: Option<f64>,
    #[serde(alias = "Adj Close", default)]
    adj_close: Option<f64>,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
}

pub struct CsvAdapter {
    base_path: PathBuf,
    gap_fill_limit: usize,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            gap_fill_limit: 0,
        }
    }

    /// Forward-fill runs of up to `limit` missing closes after loading.
    pub fn with_gap_fill_limit(mut self, limit: usize) -> Self {
        self.gap_fill_limit = limit;
        self
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ScreenerError> {
    // Timestamps such as "2024-01-15 00:00:00" keep only the date part.
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| ScreenerError::Data {
        reason: format!("invalid date '{}': {}", raw, e),
    })
}

fn into_bar(row: RawRow, has_adj_close: bool) -> Result<OhlcvBar, ScreenerError> {
    let date = parse_date(&row.date)?;
    // Without an adjusted column the provider's closes are already adjusted.
    let adj_close = if has_adj_close { row.adj_close } else { row.close };
    // Only closes feed the indicators.
    let fallback = row.close.unwrap_or(0.0);

    Ok(OhlcvBar {
        date,
        open: row.open.unwrap_or(fallback),
        high: row.high.unwrap_or(fallback),
        low: row.low.unwrap_or(fallback),
        close: row.close,
        adj_close,
        volume: row.volume.map(|v| v as i64).unwrap_or(0),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, ScreenerError> {
        let path = self.csv_path(symbol);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| ScreenerError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let has_adj_close = rdr
            .headers()
            .map_err(|e| ScreenerError::Data {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .iter()
            .any(|h| h == "adj_close" || h == "Adj Close");

        let mut bars = Vec::new();
        for result in rdr.deserialize::<RawRow>() {
            let row = result.map_err(|e| ScreenerError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            bars.push(into_bar(row, has_adj_close)?);
        }

        bars.sort_by_key(|b| b.date);
        forward_fill(&mut bars, self.gap_fill_limit);
        debug!("loaded {} bars for {}", bars.len(), symbol);

        Ok(PriceSeries::new(bars))
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScreenerError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| ScreenerError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScreenerError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            match name_str.strip_suffix(".csv") {
                Some(symbol) if !symbol.is_empty() => symbols.push(symbol.to_string()),
                _ => warn!("ignoring non-CSV file {}", name_str),
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,adj_close,volume\n\
            2024-01-16,105.0,115.0,100.0,110.0,109.0,60000\n\
            2024-01-15,100.0,110.0,90.0,105.0,104.0,50000\n\
            2024-01-17,110.0,120.0,105.0,115.0,114.0,55000\n";
        fs::write(path.join("BHP.AX.csv"), csv_content).unwrap();

        let gappy = "Date,Open,High,Low,Close,Adj Close,Volume\n\
            2024-01-15,1,1,1,10.0,10.0,100\n\
            2024-01-16,,,,,,\n\
            2024-01-17,,,,,,\n\
            2024-01-18,,,,,,\n\
            2024-01-19,1,1,1,11.0,11.0,100\n";
        fs::write(path.join("TCS.NS.csv"), gappy).unwrap();

        fs::write(
            path.join("AAPL.csv"),
            "date,open,high,low,close,volume\n2024-01-15 00:00:00,1,2,0.5,1.5,10\n",
        )
        .unwrap();
        fs::write(path.join("notes.txt"), "ignore me").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_series_returns_sorted_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_series("BHP.AX").unwrap();
        let bars = &series.bars;

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, Some(105.0));
        assert_eq!(bars[0].adj_close, Some(104.0));
        assert_eq!(bars[0].volume, 50000);
        assert_eq!(series.first_unordered(), None);
    }

    #[test]
    fn blank_cells_are_missing() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_series("TCS.NS").unwrap();
        assert_eq!(series.trading_days(), 5);
        assert_eq!(series.adj_closes(), vec![10.0, 11.0]);
    }

    #[test]
    fn gap_fill_limit_applies() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path).with_gap_fill_limit(2);

        let series = adapter.fetch_series("TCS.NS").unwrap();
        let adj: Vec<_> = series.bars.iter().map(|b| b.adj_close).collect();
        assert_eq!(
            adj,
            vec![Some(10.0), Some(10.0), Some(10.0), None, Some(11.0)]
        );
    }

    #[test]
    fn missing_adj_close_column_uses_close() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_series("AAPL").unwrap();
        assert_eq!(series.bars[0].adj_close, Some(1.5));
        assert_eq!(
            series.bars[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn fetch_series_errors_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_series("XYZ"),
            Err(ScreenerError::Data { .. })
        ));
    }

    #[test]
    fn invalid_date_is_data_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "date,close,adj_close\n15/01/2024,1,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter.fetch_series("BAD").unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["AAPL", "BHP.AX", "TCS.NS"]);
    }

    #[test]
    fn data_range_reports_span_and_count() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let (first, last, count) = adapter.get_data_range("BHP.AX").unwrap().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(count, 3);
    }
}
