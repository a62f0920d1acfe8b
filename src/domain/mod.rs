//! Core domain types and logic: indicators, gates, ranking.

pub mod ohlcv;
pub mod price_series;
pub mod indicator;
pub mod gate;
pub mod rank;
pub mod screen;
pub mod universe;
pub mod config_validation;
pub mod error;
