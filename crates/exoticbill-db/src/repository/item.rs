//! # Item Repository
//!
//! Database operations for the item catalog.

use chrono::Utc;
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use exoticbill_core::{Item, Money};

const ITEM_COLUMNS: &str = "name, price, stock, created_at, updated_at";

/// Repository for item database operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Gets an item by name.
    pub async fn get(&self, name: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets an item by name inside the caller's transaction.
    ///
    /// The billing engine reads stock through the same transaction that will
    /// decrement it, so the check-then-write sequence is serialized.
    pub async fn fetch(conn: &mut SqliteConnection, name: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(item)
    }

    /// Lists the full catalog, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts a new catalog item.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - item name already exists
    pub async fn insert(&self, item: &Item) -> DbResult<()> {
        debug!(name = %item.name, "Inserting item");

        sqlx::query(
            r#"
            INSERT INTO items (name, price, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&item.name)
        .bind(item.price)
        .bind(item.stock)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Decrements stock by a sold quantity, inside the caller's transaction.
    ///
    /// ## Delta Pattern
    /// `stock = stock - ?` rather than an absolute write, with a guard so a
    /// racing decrement can never drive stock below zero: zero rows affected
    /// means the guard failed and the caller must roll back.
    pub async fn decrement_stock(
        conn: &mut SqliteConnection,
        name: &str,
        quantity: i64,
    ) -> DbResult<()> {
        debug!(name = %name, quantity = %quantity, "Decrementing stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE items
            SET stock = stock - ?2, updated_at = ?3
            WHERE name = ?1 AND stock >= ?2
            "#,
        )
        .bind(name)
        .bind(quantity)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item with sufficient stock", name));
        }

        Ok(())
    }

    /// Restocks an item by a positive delta.
    pub async fn restock(&self, name: &str, delta: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE items SET stock = stock + ?2, updated_at = ?3 WHERE name = ?1",
        )
        .bind(name)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", name));
        }

        Ok(())
    }

    /// Sets an item's price.
    pub async fn set_price(&self, name: &str, price: Money) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE items SET price = ?2, updated_at = ?3 WHERE name = ?1",
        )
        .bind(name)
        .bind(price)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", name));
        }

        Ok(())
    }

    /// Counts catalog items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
