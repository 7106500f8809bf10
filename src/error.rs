//! Error types for the availability calendar.

use chrono::NaiveDate;
use thiserror::Error;

/// Why a picked start/end pair could not be committed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("{start} → {end} is not bookable: {first_blocked} is unavailable")]
    Unavailable {
        start: NaiveDate,
        end: NaiveDate,
        first_blocked: NaiveDate,
    },

    #[error("check-out must be after check-in ({0})")]
    ZeroNights(NaiveDate),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
