use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::dto::ItemPayload;

/// Catalog entry. Every field except `id` may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_in_stock: Option<bool>,
}

#[async_trait]
pub trait ItemRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Item>, sqlx::Error>;
    async fn get(&self, id: Uuid) -> Result<Option<Item>, sqlx::Error>;
    async fn create(&self, item: ItemPayload) -> Result<Item, sqlx::Error>;
    /// Applies only the fields present in `patch`; returns the updated item.
    async fn update(&self, id: Uuid, patch: ItemPayload) -> Result<Option<Item>, sqlx::Error>;
    /// Returns whether an item was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}

#[derive(Clone)]
pub struct PgItemRepo {
    db: PgPool,
}

impl PgItemRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepo for PgItemRepo {
    async fn list(&self) -> Result<Vec<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, price, is_in_stock
            FROM items
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, price, is_in_stock
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    async fn create(&self, item: ItemPayload) -> Result<Item, sqlx::Error> {
        sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, description, price, is_in_stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, is_in_stock
            "#,
        )
        .bind(item.name)
        .bind(item.description)
        .bind(item.price)
        .bind(item.is_in_stock)
        .fetch_one(&self.db)
        .await
    }

    async fn update(&self, id: Uuid, patch: ItemPayload) -> Result<Option<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
               SET name        = COALESCE($2, name),
                   description = COALESCE($3, description),
                   price       = COALESCE($4, price),
                   is_in_stock = COALESCE($5, is_in_stock)
             WHERE id = $1
            RETURNING id, name, description, price, is_in_stock
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.is_in_stock)
        .fetch_optional(&self.db)
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
