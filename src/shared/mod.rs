use std::fmt;

use chrono::Duration;
use serde::Serialize;

pub mod error;

use error::{
    EntityValidationError, FreshnessThresholdValidationError, WeeklyWindowValidationError,
};

/// Validated catalog item identifier.
///
/// Grand Exchange item ids are small positive integers assigned upstream.
/// Construction rejects zero and negative values, so any `ItemId` reaching
/// the aggregation engine is known to be well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Returns the item id as an `i64`.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for ItemId {
    type Error = EntityValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(EntityValidationError::NonPositiveItemId(value));
        }

        Ok(Self(value))
    }
}

impl TryFrom<i32> for ItemId {
    type Error = EntityValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_from(value as i64)
    }
}

impl TryFrom<u32> for ItemId {
    type Error = EntityValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::try_from(value as i64)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated price in coins.
///
/// Prices are non-negative integers; the exchange has no fractional coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Returns the price as an `i64`.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Price {
    type Error = EntityValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(EntityValidationError::NegativePrice(value));
        }

        Ok(Self(value))
    }
}

impl TryFrom<i32> for Price {
    type Error = EntityValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_from(value as i64)
    }
}

impl TryFrom<u32> for Price {
    type Error = EntityValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::try_from(value as i64)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated maximum age of catalog metadata before a refresh is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FreshnessThreshold(Duration);

impl FreshnessThreshold {
    pub const MIN: Self = Self(Duration::minutes(1));

    pub const MAX: Self = Self(Duration::days(90));

    pub fn hours(hours: u64) -> Result<Self, FreshnessThresholdValidationError> {
        // Magnitudes chrono can not represent are far beyond MAX.
        let duration = i64::try_from(hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or(FreshnessThresholdValidationError::TooLong)?;

        Self::try_from(duration)
    }

    pub fn days(days: u64) -> Result<Self, FreshnessThresholdValidationError> {
        let duration = i64::try_from(days)
            .ok()
            .and_then(Duration::try_days)
            .ok_or(FreshnessThresholdValidationError::TooLong)?;

        Self::try_from(duration)
    }

    /// Returns the freshness threshold as a [`Duration`].
    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl TryFrom<Duration> for FreshnessThreshold {
    type Error = FreshnessThresholdValidationError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        if value < Self::MIN.0 {
            return Err(FreshnessThresholdValidationError::TooShort);
        }

        if value > Self::MAX.0 {
            return Err(FreshnessThresholdValidationError::TooLong);
        }

        Ok(Self(value))
    }
}

impl fmt::Display for FreshnessThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated length of the trailing aggregation window used by the weekly
/// rollup. Defaults to 7 days; the window slides with the as-of instant and
/// is not calendar-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeeklyWindow(Duration);

impl WeeklyWindow {
    pub const MIN: Self = Self(Duration::days(1));

    pub const MAX: Self = Self(Duration::days(90));

    pub fn days(days: u64) -> Result<Self, WeeklyWindowValidationError> {
        let duration = i64::try_from(days)
            .ok()
            .and_then(Duration::try_days)
            .ok_or(WeeklyWindowValidationError::TooLong)?;

        Self::try_from(duration)
    }

    /// Returns the window length as a [`Duration`].
    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for WeeklyWindow {
    fn default() -> Self {
        Self(Duration::days(7))
    }
}

impl TryFrom<Duration> for WeeklyWindow {
    type Error = WeeklyWindowValidationError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        if value < Self::MIN.0 {
            return Err(WeeklyWindowValidationError::TooShort);
        }

        if value > Self::MAX.0 {
            return Err(WeeklyWindowValidationError::TooLong);
        }

        Ok(Self(value))
    }
}

impl fmt::Display for WeeklyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
