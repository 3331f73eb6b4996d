use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

pub(crate) mod error;
pub(crate) mod models;
mod postgres;
pub(crate) mod repositories;

#[cfg(test)]
mod tests;

use error::{DbError, Result};
use models::{CatalogUpsert, NewPriceObservation, PriceObservationRow};
use postgres::{catalog::PgCatalogRepo, observations::PgObservationsRepo};
use repositories::{CatalogRepository, ObservationsRepository};

/// Primary database interface for the catalog store and the observation log.
///
/// Provides the ingestion-facing write operations and the read access the
/// aggregation engine needs. Uses PostgreSQL as the underlying storage engine
/// with automatic migrations.
pub struct Database {
    pub(crate) catalog: Box<dyn CatalogRepository>,
    pub(crate) observations: Box<dyn ObservationsRepository>,
}

impl Database {
    /// Creates a new database instance and runs migrations.
    ///
    /// Establishes a connection pool to the PostgreSQL database and
    /// automatically applies any pending migrations. Returns an error if the
    /// connection fails or migrations cannot be applied.
    pub async fn new(postgres_db_url: &str) -> Result<Arc<Self>> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(postgres_db_url)
            .await
            .map_err(DbError::Connection)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DbError::Migration)?;

        let pool = Arc::new(pool);
        let catalog = Box::new(PgCatalogRepo::new(pool.clone()));
        let observations = Box::new(PgObservationsRepo::new(pool.clone()));

        Ok(Arc::new(Self {
            catalog,
            observations,
        }))
    }

    #[cfg(test)]
    pub(crate) fn from_repos(
        catalog: Box<dyn CatalogRepository>,
        observations: Box<dyn ObservationsRepository>,
    ) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            observations,
        })
    }

    /// Inserts or replaces catalog entries. The ingestion collaborator calls
    /// this after a successful metadata refresh, with `last_detail_update`
    /// set to the refresh instant.
    pub async fn upsert_catalog(&self, entries: &[CatalogUpsert]) -> Result<()> {
        self.catalog.upsert_entries(entries).await
    }

    /// Appends price observations to the log. Ids must be globally unique;
    /// observations whose id is already present are skipped, so re-delivered
    /// batches are harmless. Returns the observations actually inserted.
    pub async fn append_observations(
        &self,
        observations: &[NewPriceObservation],
    ) -> Result<Vec<PriceObservationRow>> {
        self.observations.append(observations).await
    }
}
