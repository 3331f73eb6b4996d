//! Aggregation engine computing the Latest, Daily, Weekly and AllTime rollups
//! from the catalog store and the observation log.

pub(crate) mod compute;
mod config;
mod engine;
pub(crate) mod error;
mod models;

pub use config::{ItemSelection, RollupConfig};
pub use engine::AggregationEngine;
pub use models::{
    AggregationOutcome, AllTimeRow, DailyRow, DataIntegrityWarning, LatestRow, PriceSummary,
    RollupBundle, WeeklyRow,
};
