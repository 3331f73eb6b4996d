use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::shared::{ItemId, Price};

/// Most recent observation for an item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestRow {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub recorded_at: DateTime<Utc>,
}

/// Price statistics for one item on one UTC calendar date.
///
/// Rows exist only for dates with at least one observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub min: i64,
    pub max: i64,
    pub avg: i64,
}

/// Price statistics for one item over the trailing window ending at the
/// as-of instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyRow {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub min: i64,
    pub max: i64,
    pub avg: i64,
}

/// Price statistics for one item over its full observed history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllTimeRow {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub min: i64,
    pub max: i64,
    pub avg: i64,
}

/// Min/max/mean over a set of prices. The mean is truncated toward zero to an
/// integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceSummary {
    pub min: i64,
    pub max: i64,
    pub avg: i64,
}

/// The four rollups computed from one bounded scan at one as-of instant.
///
/// All keyed collections are `BTreeMap` so iteration and serialization order
/// are deterministic: aggregating identical inputs at the same as-of instant
/// yields an identical bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupBundle {
    pub as_of: DateTime<Utc>,
    pub latest: BTreeMap<ItemId, LatestRow>,
    pub daily: BTreeMap<ItemId, BTreeMap<NaiveDate, DailyRow>>,
    pub weekly: BTreeMap<ItemId, WeeklyRow>,
    pub all_time: BTreeMap<ItemId, AllTimeRow>,
}

impl RollupBundle {
    pub(crate) fn empty(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            latest: BTreeMap::new(),
            daily: BTreeMap::new(),
            weekly: BTreeMap::new(),
            all_time: BTreeMap::new(),
        }
    }
}

/// Diagnostic raised when observations reference an item the catalog does not
/// know. The rows are excluded from every rollup but never silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataIntegrityWarning {
    pub item_id: ItemId,
    pub observations: usize,
    pub first_recorded_at: DateTime<Utc>,
    pub last_recorded_at: DateTime<Utc>,
}

impl fmt::Display for DataIntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} observation(s) for unknown item {} between {} and {}",
            self.observations,
            self.item_id,
            self.first_recorded_at.to_rfc3339(),
            self.last_recorded_at.to_rfc3339()
        )
    }
}

/// Result of one aggregation pass: the rollup bundle plus any data-integrity
/// warnings encountered while scanning the observation log.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationOutcome {
    pub bundle: RollupBundle,
    pub warnings: Vec<DataIntegrityWarning>,
}
