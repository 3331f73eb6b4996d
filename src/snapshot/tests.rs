use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::{
    Database,
    db::{
        error::{DbError, Result as DbResult},
        models::{CatalogUpsert, ItemRow, NewPriceObservation, PriceObservationRow},
        repositories::{CatalogRepository, ObservationsRepository},
    },
    rollup::{AggregationEngine, RollupConfig},
    shared::ItemId,
};

use super::*;

fn item_id(id: i64) -> ItemId {
    ItemId::try_from(id).unwrap()
}

fn catalog_row(id: i64, name: &str) -> ItemRow {
    let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    ItemRow {
        id: item_id(id),
        name: name.to_string(),
        description: format!("{name} description"),
        members: false,
        last_detail_update: Some(created_at),
        created_at,
        updated_at: created_at,
    }
}

struct FakeCatalogRepo {
    rows: Vec<ItemRow>,
}

#[async_trait]
impl CatalogRepository for FakeCatalogRepo {
    async fn upsert_entries(&self, _entries: &[CatalogUpsert]) -> DbResult<()> {
        Ok(())
    }

    async fn get_all(&self) -> DbResult<Vec<ItemRow>> {
        Ok(self.rows.clone())
    }
}

/// Observation fake that can be flipped into a failing mode to exercise the
/// failed-cycle path.
struct SwitchableObservationsRepo {
    rows: Vec<PriceObservationRow>,
    fail: Arc<AtomicBool>,
}

#[async_trait]
impl ObservationsRepository for SwitchableObservationsRepo {
    async fn append(
        &self,
        _observations: &[NewPriceObservation],
    ) -> DbResult<Vec<PriceObservationRow>> {
        Ok(Vec::new())
    }

    async fn get_up_to(&self, as_of: DateTime<Utc>) -> DbResult<Vec<PriceObservationRow>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DbError::Query(sqlx::Error::RowNotFound));
        }

        Ok(self
            .rows
            .iter()
            .filter(|row| row.recorded_at <= as_of)
            .cloned()
            .collect())
    }

    async fn get_for_items_up_to(
        &self,
        items: &[ItemId],
        as_of: DateTime<Utc>,
    ) -> DbResult<Vec<PriceObservationRow>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DbError::Query(sqlx::Error::RowNotFound));
        }

        Ok(self
            .rows
            .iter()
            .filter(|row| row.recorded_at <= as_of && items.contains(&row.item_id))
            .cloned()
            .collect())
    }
}

fn materializer(
    items: Vec<ItemRow>,
    observations: Vec<PriceObservationRow>,
    as_of: DateTime<Utc>,
) -> (RollupMaterializer, Arc<AtomicBool>) {
    let fail = Arc::new(AtomicBool::new(false));

    let db = Database::from_repos(
        Box::new(FakeCatalogRepo { rows: items }),
        Box::new(SwitchableObservationsRepo {
            rows: observations,
            fail: fail.clone(),
        }),
    );

    let engine = AggregationEngine::new(db, RollupConfig::default().set_as_of(as_of));
    let store = SnapshotStore::new();

    (RollupMaterializer::new(engine, store), fail)
}

mod store {
    use super::*;

    #[test]
    fn snapshots_start_stale_and_empty() {
        let store = SnapshotStore::new();

        for kind in RollupKind::ALL {
            assert_eq!(store.state(kind), SnapshotState::Stale);
        }

        assert!(store.latest().is_none());
        assert!(store.daily().is_none());
        assert!(store.weekly().is_none());
        assert!(store.all_time().is_none());
    }

    #[test]
    fn begin_refresh_then_mark_stale_round_trips_state() {
        let store = SnapshotStore::new();

        store.begin_refresh();
        for kind in RollupKind::ALL {
            assert_eq!(store.state(kind), SnapshotState::Refreshing);
        }

        store.mark_stale();
        for kind in RollupKind::ALL {
            assert_eq!(store.state(kind), SnapshotState::Stale);
        }
    }

    #[test]
    fn transitions_are_broadcast() {
        let store = SnapshotStore::new();
        let mut rx = store.update_receiver();

        store.begin_refresh();

        for kind in RollupKind::ALL {
            let update = rx.try_recv().unwrap();
            assert_eq!(update.kind, kind);
            assert_eq!(update.state, SnapshotState::Refreshing);
        }

        assert!(rx.try_recv().is_err());
    }
}

mod refresh {
    use super::*;

    #[tokio::test]
    async fn publishes_all_four_snapshots() {
        let as_of = Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap();
        let recorded_at = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();

        let (materializer, _) = materializer(
            vec![catalog_row(4151, "Abyssal whip")],
            vec![PriceObservationRow::new_simple(
                item_id(4151),
                120_000,
                recorded_at,
            )],
            as_of,
        );

        let report = materializer.refresh().await.unwrap();
        assert_eq!(report.as_of, as_of);
        assert_eq!(report.items, 1);
        assert!(report.warnings.is_empty());

        let store = materializer.store();
        for kind in RollupKind::ALL {
            assert_eq!(store.state(kind), SnapshotState::Current);
        }

        let latest = store.latest_for(item_id(4151)).unwrap();
        assert_eq!(latest.price.as_i64(), 120_000);
        assert_eq!(latest.recorded_at, recorded_at);

        let daily = store
            .daily_for(item_id(4151), recorded_at.date_naive())
            .unwrap();
        assert_eq!(daily.min, 120_000);

        assert!(store.weekly_for(item_id(4151)).is_some());
        assert!(store.all_time_for(item_id(4151)).is_some());

        let snapshot = store.latest().unwrap();
        assert_eq!(snapshot.as_of, as_of);
        assert!(snapshot.published_at >= as_of);
    }

    #[tokio::test]
    async fn held_snapshot_is_unaffected_by_later_publish() {
        let as_of = Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap();
        let recorded_at = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();

        let (materializer, _) = materializer(
            vec![catalog_row(4151, "Abyssal whip")],
            vec![PriceObservationRow::new_simple(
                item_id(4151),
                120_000,
                recorded_at,
            )],
            as_of,
        );

        materializer.refresh().await.unwrap();

        let held = materializer.store().latest().unwrap();
        materializer.refresh().await.unwrap();

        // The reader's view is pinned to the snapshot it grabbed.
        let republished = materializer.store().latest().unwrap();
        assert!(!Arc::ptr_eq(&held, &republished));
        assert_eq!(
            held.rows.get(&item_id(4151)).unwrap().price.as_i64(),
            120_000
        );
    }

    #[tokio::test]
    async fn failed_cycle_keeps_previous_snapshots_and_reverts_to_stale() {
        let as_of = Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap();
        let recorded_at = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();

        let (materializer, fail) = materializer(
            vec![catalog_row(4151, "Abyssal whip")],
            vec![PriceObservationRow::new_simple(
                item_id(4151),
                120_000,
                recorded_at,
            )],
            as_of,
        );

        materializer.refresh().await.unwrap();
        let before = materializer.store().latest().unwrap();

        fail.store(true, Ordering::SeqCst);

        let err = materializer.refresh().await.unwrap_err();
        assert!(matches!(err, PublishError::Aggregation(_)));

        let store = materializer.store();
        for kind in RollupKind::ALL {
            assert_eq!(store.state(kind), SnapshotState::Stale);
        }

        // Last good contents are still served.
        let after = store.latest().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn refresh_transitions_are_observable() {
        let as_of = Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap();

        let (materializer, _) = materializer(vec![catalog_row(2, "Cannonball")], Vec::new(), as_of);

        let mut rx = materializer.store().update_receiver();
        materializer.refresh().await.unwrap();

        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }

        // Four Refreshing transitions, then four Current ones.
        assert_eq!(updates.len(), 8);
        assert!(
            updates[..4]
                .iter()
                .all(|u| u.state == SnapshotState::Refreshing)
        );
        assert!(
            updates[4..]
                .iter()
                .all(|u| u.state == SnapshotState::Current)
        );
    }

    #[tokio::test]
    async fn missing_item_lookups_return_none() {
        let as_of = Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap();

        let (materializer, _) = materializer(vec![catalog_row(2, "Cannonball")], Vec::new(), as_of);
        materializer.refresh().await.unwrap();

        let store = materializer.store();
        assert!(store.latest_for(item_id(9999)).is_none());
        assert!(
            store
                .daily_for(item_id(9999), as_of.date_naive())
                .is_none()
        );
        assert!(store.weekly_for(item_id(9999)).is_none());
        assert!(store.all_time_for(item_id(9999)).is_none());
    }
}
