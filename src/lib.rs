#![doc = include_str!("../README.md")]

mod db;
/// Exports [`RefreshEngine`] and other types related to scheduled snapshot
/// refresh.
///
/// [`RefreshEngine`]: crate::refresh::RefreshEngine
pub mod refresh;
/// Exports [`AggregationEngine`] and other types related to rollup
/// computation.
///
/// [`AggregationEngine`]: crate::rollup::AggregationEngine
pub mod rollup;
mod shared;
/// Exports [`SnapshotStore`], [`RollupMaterializer`], and other types related
/// to published snapshots.
///
/// [`SnapshotStore`]: crate::snapshot::SnapshotStore
/// [`RollupMaterializer`]: crate::snapshot::RollupMaterializer
pub mod snapshot;
/// Exports [`StalenessPolicy`] for deciding which catalog entries need a
/// metadata refresh.
///
/// [`StalenessPolicy`]: crate::staleness::StalenessPolicy
pub mod staleness;
mod util;

pub use db::Database;

/// Error types returned by `ge-tracker`.
pub mod error {
    pub use super::db::error::DbError;
    pub use super::refresh::{
        RefreshError, RefreshProcessError, RefreshProcessFatalError,
        RefreshProcessRecoverableError,
    };
    pub use super::rollup::error::RollupError;
    pub use super::shared::error::{
        EntityValidationError, FreshnessThresholdValidationError, WeeklyWindowValidationError,
    };
    pub use super::snapshot::PublishError;

    /// Convenience general-purpose Result type alias.
    pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
}

/// Exports database models and shared validated types.
pub mod models {
    pub use super::db::models::{CatalogUpsert, ItemRow, NewPriceObservation, PriceObservationRow};
    pub use super::shared::{FreshnessThreshold, ItemId, Price, WeeklyWindow};
}
