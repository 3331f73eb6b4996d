use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::{
    rollup::{AllTimeRow, DailyRow, LatestRow, RollupBundle, WeeklyRow},
    shared::ItemId,
};

use super::state::{
    RollupKind, SnapshotReceiver, SnapshotState, SnapshotTransmitter, SnapshotUpdate,
};

/// The complete output of one aggregation pass for one rollup kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<T> {
    pub as_of: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
    pub rows: T,
}

pub type LatestSnapshot = Snapshot<BTreeMap<ItemId, LatestRow>>;
pub type DailySnapshot = Snapshot<BTreeMap<ItemId, BTreeMap<NaiveDate, DailyRow>>>;
pub type WeeklySnapshot = Snapshot<BTreeMap<ItemId, WeeklyRow>>;
pub type AllTimeSnapshot = Snapshot<BTreeMap<ItemId, AllTimeRow>>;

/// One independently replaceable snapshot slot.
///
/// The previous snapshot stays fully readable while a new one is staged;
/// publication is a single pointer swap, so concurrent readers never observe
/// a partially written rollup.
#[derive(Debug)]
struct Slot<T> {
    state: Mutex<SnapshotState>,
    current: RwLock<Option<Arc<Snapshot<T>>>>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(SnapshotState::Stale),
            current: RwLock::new(None),
        }
    }

    fn state(&self) -> SnapshotState {
        *self
            .state
            .lock()
            .expect("`Slot` state mutex can't be poisoned")
    }

    fn set_state(&self, new_state: SnapshotState) {
        *self
            .state
            .lock()
            .expect("`Slot` state mutex can't be poisoned") = new_state;
    }

    fn current(&self) -> Option<Arc<Snapshot<T>>> {
        self.current
            .read()
            .expect("`Slot` snapshot lock can't be poisoned")
            .clone()
    }

    fn swap(&self, snapshot: Arc<Snapshot<T>>) {
        *self
            .current
            .write()
            .expect("`Slot` snapshot lock can't be poisoned") = Some(snapshot);
    }
}

/// Holds the four published rollup snapshots and their lifecycle states.
///
/// Reads hand out `Arc` clones, so a consumer holding a snapshot keeps a
/// consistent view even across subsequent publishes.
#[derive(Debug)]
pub struct SnapshotStore {
    latest: Slot<BTreeMap<ItemId, LatestRow>>,
    daily: Slot<BTreeMap<ItemId, BTreeMap<NaiveDate, DailyRow>>>,
    weekly: Slot<BTreeMap<ItemId, WeeklyRow>>,
    all_time: Slot<BTreeMap<ItemId, AllTimeRow>>,
    update_tx: SnapshotTransmitter,
}

impl SnapshotStore {
    pub fn new() -> Arc<Self> {
        let (update_tx, _) = broadcast::channel::<SnapshotUpdate>(100);

        Arc::new(Self {
            latest: Slot::new(),
            daily: Slot::new(),
            weekly: Slot::new(),
            all_time: Slot::new(),
            update_tx,
        })
    }

    pub fn update_receiver(&self) -> SnapshotReceiver {
        self.update_tx.subscribe()
    }

    pub fn state(&self, kind: RollupKind) -> SnapshotState {
        match kind {
            RollupKind::Latest => self.latest.state(),
            RollupKind::Daily => self.daily.state(),
            RollupKind::Weekly => self.weekly.state(),
            RollupKind::AllTime => self.all_time.state(),
        }
    }

    pub fn latest(&self) -> Option<Arc<LatestSnapshot>> {
        self.latest.current()
    }

    pub fn daily(&self) -> Option<Arc<DailySnapshot>> {
        self.daily.current()
    }

    pub fn weekly(&self) -> Option<Arc<WeeklySnapshot>> {
        self.weekly.current()
    }

    pub fn all_time(&self) -> Option<Arc<AllTimeSnapshot>> {
        self.all_time.current()
    }

    pub fn latest_for(&self, item: ItemId) -> Option<LatestRow> {
        self.latest
            .current()
            .and_then(|snapshot| snapshot.rows.get(&item).cloned())
    }

    pub fn daily_for(&self, item: ItemId, date: NaiveDate) -> Option<DailyRow> {
        self.daily.current().and_then(|snapshot| {
            snapshot
                .rows
                .get(&item)
                .and_then(|dates| dates.get(&date).cloned())
        })
    }

    pub fn weekly_for(&self, item: ItemId) -> Option<WeeklyRow> {
        self.weekly
            .current()
            .and_then(|snapshot| snapshot.rows.get(&item).cloned())
    }

    pub fn all_time_for(&self, item: ItemId) -> Option<AllTimeRow> {
        self.all_time
            .current()
            .and_then(|snapshot| snapshot.rows.get(&item).cloned())
    }

    fn transition(&self, kind: RollupKind, new_state: SnapshotState) {
        match kind {
            RollupKind::Latest => self.latest.set_state(new_state),
            RollupKind::Daily => self.daily.set_state(new_state),
            RollupKind::Weekly => self.weekly.set_state(new_state),
            RollupKind::AllTime => self.all_time.set_state(new_state),
        }

        // Ignore no-receivers errors
        let _ = self.update_tx.send(SnapshotUpdate {
            kind,
            state: new_state,
        });
    }

    /// Marks all four snapshots `Refreshing` at the start of an aggregation
    /// pass. The previously published contents remain readable throughout.
    pub(crate) fn begin_refresh(&self) {
        for kind in RollupKind::ALL {
            self.transition(kind, SnapshotState::Refreshing);
        }
    }

    /// Reverts all four snapshots to `Stale` after a failed cycle, leaving
    /// published contents untouched.
    pub(crate) fn mark_stale(&self) {
        for kind in RollupKind::ALL {
            self.transition(kind, SnapshotState::Stale);
        }
    }

    /// Publishes the bundle as four full-replace snapshots and marks them
    /// `Current`. Each swap is atomic with respect to readers.
    pub(crate) fn publish(&self, bundle: RollupBundle, published_at: DateTime<Utc>) {
        let as_of = bundle.as_of;

        self.latest.swap(Arc::new(Snapshot {
            as_of,
            published_at,
            rows: bundle.latest,
        }));
        self.transition(RollupKind::Latest, SnapshotState::Current);

        self.daily.swap(Arc::new(Snapshot {
            as_of,
            published_at,
            rows: bundle.daily,
        }));
        self.transition(RollupKind::Daily, SnapshotState::Current);

        self.weekly.swap(Arc::new(Snapshot {
            as_of,
            published_at,
            rows: bundle.weekly,
        }));
        self.transition(RollupKind::Weekly, SnapshotState::Current);

        self.all_time.swap(Arc::new(Snapshot {
            as_of,
            published_at,
            rows: bundle.all_time,
        }));
        self.transition(RollupKind::AllTime, SnapshotState::Current);
    }
}
