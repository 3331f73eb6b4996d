use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{
    Database,
    db::models::{ItemRow, PriceObservationRow},
    shared::ItemId,
};

use super::{
    compute,
    config::{ItemSelection, RollupConfig},
    error::Result,
    models::{
        AggregationOutcome, AllTimeRow, DailyRow, DataIntegrityWarning, LatestRow, RollupBundle,
        WeeklyRow,
    },
};

/// Read-only aggregation engine computing the four rollups from the catalog
/// store and the observation log.
///
/// Every pass is a full recompute over a bounded scan of the log: simpler and
/// idempotent compared to incremental maintenance, which would need
/// invalidation logic for late or out-of-order observations. Each pass loads
/// the scanned observations into memory, so the log must stay small enough
/// for a single pass; restrict [`ItemSelection`] if it outgrows that.
pub struct AggregationEngine {
    db: Arc<Database>,
    config: RollupConfig,
}

impl AggregationEngine {
    pub fn new(db: Arc<Database>, config: RollupConfig) -> Self {
        Self { db, config }
    }

    pub fn config(&self) -> &RollupConfig {
        &self.config
    }

    /// Runs one aggregation pass at the configured as-of instant, defaulting
    /// to the wall clock.
    pub async fn aggregate(&self) -> Result<AggregationOutcome> {
        let as_of = self.config.as_of().unwrap_or_else(Utc::now);
        self.aggregate_as_of(as_of).await
    }

    /// Runs one aggregation pass bounded to observations with
    /// `recorded_at <= as_of`.
    pub async fn aggregate_as_of(&self, as_of: DateTime<Utc>) -> Result<AggregationOutcome> {
        let (items, mut observations) = match self.config.items() {
            ItemSelection::Observed => tokio::try_join!(
                self.db.catalog.get_all(),
                self.db.observations.get_up_to(as_of),
            )?,
            ItemSelection::Only(ids) => tokio::try_join!(
                self.db.catalog.get_all(),
                self.db.observations.get_for_items_up_to(ids, as_of),
            )?,
        };

        // Normalize scan order here instead of trusting the store, so two
        // passes over identical inputs always see identical sequences.
        observations.sort_by(|a, b| {
            a.recorded_at
                .cmp(&b.recorded_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let catalog: BTreeMap<ItemId, &ItemRow> =
            items.iter().map(|item| (item.id, item)).collect();

        let mut grouped: BTreeMap<ItemId, Vec<PriceObservationRow>> = BTreeMap::new();
        for observation in observations {
            grouped
                .entry(observation.item_id)
                .or_default()
                .push(observation);
        }

        let mut bundle = RollupBundle::empty(as_of);
        let mut warnings = Vec::new();

        for (item_id, item_observations) in &grouped {
            let Some(item) = catalog.get(item_id) else {
                let warning = Self::orphan_warning(*item_id, item_observations);
                warn!(item_id = %warning.item_id, observations = warning.observations,
                    "observations reference an unknown catalog item; excluded from rollups");
                warnings.push(warning);
                continue;
            };

            if let Some(observation) = compute::latest(item_observations) {
                bundle.latest.insert(
                    *item_id,
                    LatestRow {
                        item_id: *item_id,
                        name: item.name.clone(),
                        description: item.description.clone(),
                        price: observation.price,
                        recorded_at: observation.recorded_at,
                    },
                );
            }

            let daily: BTreeMap<_, _> = compute::daily_partitions(item_observations)
                .into_iter()
                .map(|(date, summary)| {
                    (
                        date,
                        DailyRow {
                            item_id: *item_id,
                            name: item.name.clone(),
                            description: item.description.clone(),
                            date,
                            min: summary.min,
                            max: summary.max,
                            avg: summary.avg,
                        },
                    )
                })
                .collect();

            if !daily.is_empty() {
                bundle.daily.insert(*item_id, daily);
            }

            if let Some(summary) =
                compute::window_summary(item_observations, as_of, self.config.weekly_window())
            {
                bundle.weekly.insert(
                    *item_id,
                    WeeklyRow {
                        item_id: *item_id,
                        name: item.name.clone(),
                        description: item.description.clone(),
                        min: summary.min,
                        max: summary.max,
                        avg: summary.avg,
                    },
                );
            }

            if let Some(summary) = compute::summarize(item_observations.iter()) {
                bundle.all_time.insert(
                    *item_id,
                    AllTimeRow {
                        item_id: *item_id,
                        name: item.name.clone(),
                        description: item.description.clone(),
                        min: summary.min,
                        max: summary.max,
                        avg: summary.avg,
                    },
                );
            }
        }

        Ok(AggregationOutcome { bundle, warnings })
    }

    fn orphan_warning(
        item_id: ItemId,
        observations: &[PriceObservationRow],
    ) -> DataIntegrityWarning {
        // Groups are built from a non-empty scan, so both bounds exist.
        let first = observations
            .iter()
            .map(|observation| observation.recorded_at)
            .min()
            .expect("orphan group is never empty");
        let last = observations
            .iter()
            .map(|observation| observation.recorded_at)
            .max()
            .expect("orphan group is never empty");

        DataIntegrityWarning {
            item_id,
            observations: observations.len(),
            first_recorded_at: first,
            last_recorded_at: last,
        }
    }
}
