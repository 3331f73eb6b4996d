//! Staleness policy for catalog metadata.
//!
//! Decides which catalog entries are due for a refresh from the item-details
//! API. Pure decision logic: the ingestion collaborator applies the plan and
//! writes back `last_detail_update` on success.

use chrono::{DateTime, Utc};

use crate::{
    db::models::ItemRow,
    shared::{FreshnessThreshold, ItemId},
};

/// Staleness policy parameterized by a freshness threshold.
///
/// An entry needs a refresh when its metadata has never been fetched, or when
/// its age at `now` exceeds the threshold. Malformed items cannot reach this
/// policy: id validation happens at the ingestion boundary, so every
/// [`ItemRow`] here carries a well-formed id.
#[derive(Debug, Clone, Copy)]
pub struct StalenessPolicy {
    threshold: FreshnessThreshold,
}

impl StalenessPolicy {
    pub fn new(threshold: FreshnessThreshold) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> FreshnessThreshold {
        self.threshold
    }

    /// Returns whether metadata last refreshed at `last_detail_update` needs
    /// refreshing at `now`. No side effects; the caller updates
    /// `last_detail_update` after a successful refresh.
    pub fn needs_refresh(
        &self,
        last_detail_update: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        match last_detail_update {
            None => true,
            Some(last) => now - last > self.threshold.as_duration(),
        }
    }

    /// Selects up to `max_batch` stale entries, oldest metadata first.
    ///
    /// Entries that were never refreshed sort before every dated entry, so a
    /// bounded batch always drains the never-fetched backlog before
    /// re-fetching aged metadata.
    pub fn refresh_plan(
        &self,
        items: &[ItemRow],
        now: DateTime<Utc>,
        max_batch: usize,
    ) -> Vec<ItemId> {
        let mut stale: Vec<&ItemRow> = items
            .iter()
            .filter(|item| self.needs_refresh(item.last_detail_update, now))
            .collect();

        stale.sort_by_key(|item| (item.last_detail_update, item.id));

        stale
            .into_iter()
            .take(max_batch)
            .map(|item| item.id)
            .collect()
    }
}
