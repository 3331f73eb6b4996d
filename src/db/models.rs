use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::shared::{ItemId, Price, error::EntityValidationError};

/// Database row representing a catalog item.
///
/// Holds the descriptive metadata fetched from the item-details API together
/// with the instant that metadata was last refreshed. Rows persist
/// indefinitely once seen and are mutated only by catalog refreshes.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ItemRow {
    #[sqlx(try_from = "i64")]
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub members: bool,
    pub last_detail_update: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItemRow {
    /// Returns a formatted string representation of the item data for display
    /// purposes.
    pub fn as_data_str(&self) -> String {
        let last_update_str = match self.last_detail_update {
            Some(time) => time.to_rfc3339(),
            None => "never".to_string(),
        };

        format!(
            "id: {}\n\
             name: {}\n\
             members: {}\n\
             last_detail_update: {last_update_str}",
            self.id, self.name, self.members
        )
    }
}

impl fmt::Display for ItemRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item Row:")?;
        for line in self.as_data_str().lines() {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}

/// Database row representing a single price observation.
///
/// Immutable and append-only; one row records the price of one item at one
/// instant.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PriceObservationRow {
    pub id: Uuid,
    #[sqlx(try_from = "i64")]
    pub item_id: ItemId,
    #[sqlx(try_from = "i64")]
    pub price: Price,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PriceObservationRow {
    #[cfg(test)]
    pub(crate) fn new_simple(item_id: ItemId, price: i64, recorded_at: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4(), item_id, price, recorded_at)
    }

    #[cfg(test)]
    pub(crate) fn with_id(
        id: Uuid,
        item_id: ItemId,
        price: i64,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            item_id,
            price: Price::try_from(price).expect("test price must be non-negative"),
            recorded_at,
            created_at: recorded_at,
        }
    }

    /// Returns a formatted string representation of the observation data for
    /// display purposes.
    pub fn as_data_str(&self) -> String {
        format!(
            "id: {}\n\
             item_id: {}\n\
             price: {}\n\
             recorded_at: {}",
            self.id,
            self.item_id,
            self.price,
            self.recorded_at.to_rfc3339()
        )
    }
}

impl fmt::Display for PriceObservationRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price Observation Row:")?;
        for line in self.as_data_str().lines() {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}

/// Validated catalog entry handed to [`Database::upsert_catalog`] by the
/// ingestion collaborator.
///
/// Construction is the ingestion boundary for catalog metadata: malformed
/// entries fail here and never reach the store.
///
/// [`Database::upsert_catalog`]: crate::Database::upsert_catalog
#[derive(Debug, Clone)]
pub struct CatalogUpsert {
    id: ItemId,
    name: String,
    description: String,
    members: bool,
    last_detail_update: Option<DateTime<Utc>>,
}

impl CatalogUpsert {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        description: impl Into<String>,
        members: bool,
        last_detail_update: Option<DateTime<Utc>>,
    ) -> Result<Self, EntityValidationError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(EntityValidationError::EmptyName);
        }

        Ok(Self {
            id,
            name,
            description: description.into(),
            members,
            last_detail_update,
        })
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn members(&self) -> bool {
        self.members
    }

    pub fn last_detail_update(&self) -> Option<DateTime<Utc>> {
        self.last_detail_update
    }
}

/// Validated price observation handed to [`Database::append_observations`] by
/// the ingestion collaborator.
///
/// The id must be globally unique; appending the same id twice is a no-op,
/// which keeps re-delivered batches idempotent.
///
/// [`Database::append_observations`]: crate::Database::append_observations
#[derive(Debug, Clone)]
pub struct NewPriceObservation {
    pub id: Uuid,
    pub item_id: ItemId,
    pub price: Price,
    pub recorded_at: DateTime<Utc>,
}

impl NewPriceObservation {
    pub fn new(id: Uuid, item_id: ItemId, price: Price, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id,
            item_id,
            price,
            recorded_at,
        }
    }
}
