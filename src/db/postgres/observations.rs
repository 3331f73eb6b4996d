use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::shared::ItemId;

use super::super::{
    error::{DbError, Result},
    models::{NewPriceObservation, PriceObservationRow},
    repositories::ObservationsRepository,
};

pub(crate) struct PgObservationsRepo {
    pool: Arc<Pool<Postgres>>,
}

impl PgObservationsRepo {
    pub fn new(pool: Arc<Pool<Postgres>>) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &Pool<Postgres> {
        self.pool.as_ref()
    }
}

#[async_trait]
impl ObservationsRepository for PgObservationsRepo {
    async fn append(
        &self,
        observations: &[NewPriceObservation],
    ) -> Result<Vec<PriceObservationRow>> {
        if observations.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool().begin().await.map_err(DbError::TransactionBegin)?;

        let mut inserted = Vec::with_capacity(observations.len());

        for observation in observations {
            let row = sqlx::query_as::<_, PriceObservationRow>(
                r#"
                    INSERT INTO price_observations (id, item_id, price, recorded_at)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (id) DO NOTHING
                    RETURNING id, item_id, price, recorded_at, created_at
                "#,
            )
            .bind(observation.id)
            .bind(observation.item_id.as_i64())
            .bind(observation.price.as_i64())
            .bind(observation.recorded_at)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::Query)?;

            if let Some(row) = row {
                inserted.push(row);
            }
        }

        tx.commit().await.map_err(DbError::TransactionCommit)?;

        Ok(inserted)
    }

    async fn get_up_to(&self, as_of: DateTime<Utc>) -> Result<Vec<PriceObservationRow>> {
        sqlx::query_as::<_, PriceObservationRow>(
            r#"
                SELECT id, item_id, price, recorded_at, created_at
                FROM price_observations
                WHERE recorded_at <= $1
                ORDER BY recorded_at ASC, id ASC
            "#,
        )
        .bind(as_of)
        .fetch_all(self.pool())
        .await
        .map_err(DbError::Query)
    }

    async fn get_for_items_up_to(
        &self,
        items: &[ItemId],
        as_of: DateTime<Utc>,
    ) -> Result<Vec<PriceObservationRow>> {
        let ids: Vec<i64> = items.iter().map(ItemId::as_i64).collect();

        sqlx::query_as::<_, PriceObservationRow>(
            r#"
                SELECT id, item_id, price, recorded_at, created_at
                FROM price_observations
                WHERE recorded_at <= $1 AND item_id = ANY($2)
                ORDER BY recorded_at ASC, id ASC
            "#,
        )
        .bind(as_of)
        .bind(&ids)
        .fetch_all(self.pool())
        .await
        .map_err(DbError::Query)
    }
}
