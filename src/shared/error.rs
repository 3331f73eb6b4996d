use thiserror::Error;

use super::{FreshnessThreshold, WeeklyWindow};

/// Rejections raised when building catalog entries or price observations from
/// raw ingestion input. Values failing these checks never reach a store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityValidationError {
    #[error("Invalid item id {0}, must be a positive integer")]
    NonPositiveItemId(i64),

    #[error("Invalid price {0}, must be non-negative")]
    NegativePrice(i64),

    #[error("Invalid item name, must not be empty")]
    EmptyName,
}

#[derive(Error, Debug)]
pub enum FreshnessThresholdValidationError {
    #[error(
        "Invalid freshness threshold, must be at least {}",
        FreshnessThreshold::MIN
    )]
    TooShort,

    #[error(
        "Invalid freshness threshold, must be at most {}",
        FreshnessThreshold::MAX
    )]
    TooLong,
}

#[derive(Error, Debug)]
pub enum WeeklyWindowValidationError {
    #[error("Invalid rolling window, must be at least {}", WeeklyWindow::MIN)]
    TooShort,

    #[error("Invalid rolling window, must be at most {}", WeeklyWindow::MAX)]
    TooLong,
}
