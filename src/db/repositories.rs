use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::shared::ItemId;

use super::{
    error::Result,
    models::{CatalogUpsert, ItemRow, NewPriceObservation, PriceObservationRow},
};

#[async_trait]
pub(crate) trait CatalogRepository: Send + Sync {
    /// Inserts or updates catalog entries in a single transaction.
    /// Existing rows are fully replaced by the incoming entry; `updated_at`
    /// is bumped on every write.
    async fn upsert_entries(&self, entries: &[CatalogUpsert]) -> Result<()>;

    async fn get_all(&self) -> Result<Vec<ItemRow>>;
}

#[async_trait]
pub(crate) trait ObservationsRepository: Send + Sync {
    /// Appends observations using INSERT ON CONFLICT DO NOTHING so
    /// re-delivered batches stay idempotent.
    ///
    /// Returns only the observations that were actually inserted.
    async fn append(&self, observations: &[NewPriceObservation])
    -> Result<Vec<PriceObservationRow>>;

    /// Fetches all observations with `recorded_at <= as_of`, ordered by
    /// `(recorded_at, id)` so scans are deterministic.
    async fn get_up_to(&self, as_of: DateTime<Utc>) -> Result<Vec<PriceObservationRow>>;

    /// Same as [`get_up_to`], restricted to the given item ids.
    ///
    /// [`get_up_to`]: ObservationsRepository::get_up_to
    async fn get_for_items_up_to(
        &self,
        items: &[ItemId],
        as_of: DateTime<Utc>,
    ) -> Result<Vec<PriceObservationRow>>;
}
