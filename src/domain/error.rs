//! Domain error types.

/// Top-level error type for momentum-screener.
///
/// Per-symbol computation failures never surface here; they are folded into
/// the symbol's indicator record so the rest of the batch keeps going.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("top_n must be at least 1, got {0}")]
    InvalidTopN(usize),

    #[error("unknown return formula '{0}' (expected 'standard' or 'unconventional')")]
    UnknownReturnFormula(String),

    #[error("unknown index '{name}'. Available indices: {available}")]
    UnknownIndex { name: String, available: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no price data for any of the {requested} requested symbols")]
    NoData { requested: usize },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. }
            | ScreenerError::InvalidTopN(_)
            | ScreenerError::UnknownReturnFormula(_) => 2,
            ScreenerError::Data { .. } | ScreenerError::NoData { .. } => 3,
            ScreenerError::Report { .. } => 4,
            ScreenerError::UnknownIndex { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
