use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::rollup::{AggregationEngine, DataIntegrityWarning};

use super::{
    error::{PublishError, Result},
    store::SnapshotStore,
};

/// What a completed refresh cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
    /// The evaluation instant all four published snapshots share.
    pub as_of: DateTime<Utc>,
    /// Number of catalog items with at least one observation.
    pub items: usize,
    /// Orphan observation diagnostics surfaced by the aggregation pass.
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Runs full aggregation passes and publishes their output to a
/// [`SnapshotStore`].
///
/// A failed pass leaves the previously published snapshots in place. Readers
/// keep serving the last good contents while the state reverts to `Stale`.
pub struct RollupMaterializer {
    engine: AggregationEngine,
    store: Arc<SnapshotStore>,
}

impl RollupMaterializer {
    pub fn new(engine: AggregationEngine, store: Arc<SnapshotStore>) -> Self {
        Self { engine, store }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Recomputes all four rollups from the observation log and atomically
    /// swaps them into the store.
    pub async fn refresh(&self) -> Result<RefreshReport> {
        self.store.begin_refresh();

        let outcome = match self.engine.aggregate().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Aggregation pass failed, keeping previous snapshots: {e}");
                self.store.mark_stale();
                return Err(PublishError::Aggregation(e));
            }
        };

        let as_of = outcome.bundle.as_of;
        let items = outcome.bundle.all_time.len();
        let warnings = outcome.warnings;

        self.store.publish(outcome.bundle, Utc::now());

        info!(
            "Published rollup snapshots as of {as_of} covering {items} item(s), \
            {} integrity warning(s)",
            warnings.len()
        );

        Ok(RefreshReport {
            as_of,
            items,
            warnings,
        })
    }
}
