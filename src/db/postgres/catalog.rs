use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::super::{
    error::{DbError, Result},
    models::{CatalogUpsert, ItemRow},
    repositories::CatalogRepository,
};

pub(crate) struct PgCatalogRepo {
    pool: Arc<Pool<Postgres>>,
}

impl PgCatalogRepo {
    pub fn new(pool: Arc<Pool<Postgres>>) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &Pool<Postgres> {
        self.pool.as_ref()
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepo {
    async fn upsert_entries(&self, entries: &[CatalogUpsert]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool().begin().await.map_err(DbError::TransactionBegin)?;

        for entry in entries {
            sqlx::query(
                r#"
                    INSERT INTO items (id, name, description, members, last_detail_update)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (id) DO UPDATE SET
                        name = EXCLUDED.name,
                        description = EXCLUDED.description,
                        members = EXCLUDED.members,
                        last_detail_update = EXCLUDED.last_detail_update,
                        updated_at = now()
                "#,
            )
            .bind(entry.id().as_i64())
            .bind(entry.name())
            .bind(entry.description())
            .bind(entry.members())
            .bind(entry.last_detail_update())
            .execute(&mut *tx)
            .await
            .map_err(DbError::Query)?;
        }

        tx.commit().await.map_err(DbError::TransactionCommit)?;

        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<ItemRow>> {
        sqlx::query_as::<_, ItemRow>(
            r#"
                SELECT id, name, description, members, last_detail_update,
                       created_at, updated_at
                FROM items
                ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(DbError::Query)
    }
}
