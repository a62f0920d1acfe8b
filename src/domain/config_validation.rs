//! Configuration validation.
//!
//! Validates all config fields before a screen runs.

use crate::domain::error::ScreenerError;
use crate::domain::gate::ReturnFormula;
use crate::domain::indicator::Parallelism;
use crate::domain::rank::DEFAULT_TOP_N;
use crate::domain::screen::ScreenConfig;
use crate::domain::universe::{parse_codes, ticker_list};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_GAP_FILL_LIMIT: usize = 2;

pub fn validate_screen_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_universe(config)?;
    read_top_n(config)?;
    read_return_formula(config)?;
    validate_data_directory(config)?;
    read_gap_fill_limit(config)?;
    read_parallelism(config)?;
    read_save_csv(config)?;
    Ok(())
}

/// Screen knobs from `[screen]`, with defaults for absent keys.
pub fn load_screen_config(config: &dyn ConfigPort) -> Result<ScreenConfig, ScreenerError> {
    Ok(ScreenConfig {
        top_n: read_top_n(config)?,
        formula: read_return_formula(config)?,
        parallelism: read_parallelism(config)?,
    })
}

pub fn read_parallelism(config: &dyn ConfigPort) -> Result<Parallelism, ScreenerError> {
    Ok(if config.get_bool("screen", "parallel", true)? {
        Parallelism::Parallel
    } else {
        Parallelism::Sequential
    })
}

pub fn read_save_csv(config: &dyn ConfigPort) -> Result<bool, ScreenerError> {
    config.get_bool("output", "save_csv", true)
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_universe(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    if let Some(codes) = non_empty(config, "screen", "codes") {
        parse_codes(&codes).map_err(|e| ScreenerError::ConfigInvalid {
            section: "screen".to_string(),
            key: "codes".to_string(),
            reason: e.to_string(),
        })?;
        return Ok(());
    }
    match non_empty(config, "screen", "index") {
        Some(index) => ticker_list(&index).map(|_| ()),
        None => Err(ScreenerError::ConfigMissing {
            section: "screen".to_string(),
            key: "index".to_string(),
        }),
    }
}

pub fn read_top_n(config: &dyn ConfigPort) -> Result<usize, ScreenerError> {
    let Some(raw) = non_empty(config, "screen", "top_n") else {
        return Ok(DEFAULT_TOP_N);
    };
    let value: i64 = raw.parse().map_err(|_| ScreenerError::ConfigInvalid {
        section: "screen".to_string(),
        key: "top_n".to_string(),
        reason: format!("top_n must be an integer, got '{}'", raw),
    })?;
    if value < 1 {
        return Err(ScreenerError::ConfigInvalid {
            section: "screen".to_string(),
            key: "top_n".to_string(),
            reason: "top_n must be at least 1".to_string(),
        });
    }
    Ok(value as usize)
}

pub fn read_return_formula(config: &dyn ConfigPort) -> Result<ReturnFormula, ScreenerError> {
    match non_empty(config, "screen", "return_formula") {
        Some(raw) => raw.parse(),
        None => Ok(ReturnFormula::default()),
    }
}

fn validate_data_directory(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match non_empty(config, "data", "directory") {
        Some(_) => Ok(()),
        None => Err(ScreenerError::ConfigMissing {
            section: "data".to_string(),
            key: "directory".to_string(),
        }),
    }
}

pub fn read_gap_fill_limit(config: &dyn ConfigPort) -> Result<usize, ScreenerError> {
    let Some(raw) = non_empty(config, "data", "gap_fill_limit") else {
        return Ok(DEFAULT_GAP_FILL_LIMIT);
    };
    raw.parse::<usize>()
        .map_err(|_| ScreenerError::ConfigInvalid {
            section: "data".to_string(),
            key: "gap_fill_limit".to_string(),
            reason: "gap_fill_limit must be a non-negative integer".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_screen_config_passes() {
        let config = make_config(
            r#"
[screen]
index = nifty_50
top_n = 20
return_formula = standard
parallel = false

[data]
directory = ./prices
gap_fill_limit = 3

[output]
directory = ./out
"#,
        );
        assert!(validate_screen_config(&config).is_ok());
        let screen = load_screen_config(&config).unwrap();
        assert_eq!(screen.top_n, 20);
        assert_eq!(screen.formula, ReturnFormula::Standard);
        assert_eq!(screen.parallelism, Parallelism::Sequential);
        assert_eq!(read_gap_fill_limit(&config).unwrap(), 3);
    }

    #[test]
    fn defaults_apply_when_keys_absent() {
        let config = make_config("[screen]\ncodes = AAPL\n[data]\ndirectory = d\n");
        assert!(validate_screen_config(&config).is_ok());
        let screen = load_screen_config(&config).unwrap();
        assert_eq!(screen, ScreenConfig::default());
        assert_eq!(read_gap_fill_limit(&config).unwrap(), DEFAULT_GAP_FILL_LIMIT);
    }

    #[test]
    fn missing_universe_fails() {
        let config = make_config("[screen]\ntop_n = 10\n[data]\ndirectory = d\n");
        let err = validate_screen_config(&config).unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigMissing { key, .. } if key == "index"));
    }

    #[test]
    fn unknown_index_fails() {
        let config = make_config("[screen]\nindex = ftse_100\n[data]\ndirectory = d\n");
        let err = validate_screen_config(&config).unwrap_err();
        assert!(matches!(err, ScreenerError::UnknownIndex { name, .. } if name == "ftse_100"));
    }

    #[test]
    fn duplicate_codes_fail() {
        let config = make_config("[screen]\ncodes = AAPL,MSFT,aapl\n[data]\ndirectory = d\n");
        let err = validate_screen_config(&config).unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigInvalid { key, .. } if key == "codes"));
    }

    #[test]
    fn top_n_zero_fails() {
        let config = make_config("[screen]\nindex = nifty_it\ntop_n = 0\n[data]\ndirectory = d\n");
        let err = validate_screen_config(&config).unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigInvalid { key, .. } if key == "top_n"));
    }

    #[test]
    fn top_n_non_numeric_fails() {
        let config = make_config("[screen]\nindex = nifty_it\ntop_n = many\n[data]\ndirectory = d\n");
        let err = validate_screen_config(&config).unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigInvalid { key, .. } if key == "top_n"));
    }

    #[test]
    fn unknown_return_formula_fails() {
        let config = make_config(
            "[screen]\nindex = nifty_it\nreturn_formula = log\n[data]\ndirectory = d\n",
        );
        let err = validate_screen_config(&config).unwrap_err();
        assert!(matches!(err, ScreenerError::UnknownReturnFormula(s) if s == "log"));
    }

    #[test]
    fn return_formula_is_case_insensitive() {
        let config = make_config("[screen]\nreturn_formula = Standard\n");
        assert_eq!(read_return_formula(&config).unwrap(), ReturnFormula::Standard);
    }

    #[test]
    fn missing_data_directory_fails() {
        let config = make_config("[screen]\nindex = nifty_it\n");
        let err = validate_screen_config(&config).unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigMissing { key, .. } if key == "directory"));
    }

    #[test]
    fn negative_gap_fill_limit_fails() {
        let config = make_config(
            "[screen]\nindex = nifty_it\n[data]\ndirectory = d\ngap_fill_limit = -1\n",
        );
        let err = validate_screen_config(&config).unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigInvalid { key, .. } if key == "gap_fill_limit"));
    }

    #[test]
    fn unrecognised_parallel_fails() {
        let config = make_config(
            "[screen]\nindex = nifty_it\nparallel = maybe\n[data]\ndirectory = d\n",
        );
        let err = validate_screen_config(&config).unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigInvalid { key, .. } if key == "parallel"));
        assert!(load_screen_config(&config).is_err());
    }

    #[test]
    fn unrecognised_save_csv_fails() {
        let config = make_config(
            "[screen]\nindex = nifty_it\n[data]\ndirectory = d\n[output]\nsave_csv = sometimes\n",
        );
        let err = validate_screen_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ScreenerError::ConfigInvalid { section, key, .. } if section == "output" && key == "save_csv"
        ));
    }

    #[test]
    fn boolean_keys_accept_mixed_case() {
        let config = make_config("[screen]\nparallel = NO\n[output]\nsave_csv = Yes\n");
        assert_eq!(read_parallelism(&config).unwrap(), Parallelism::Sequential);
        assert!(read_save_csv(&config).unwrap());
    }
}
