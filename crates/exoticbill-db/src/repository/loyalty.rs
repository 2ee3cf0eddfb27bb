//! # Loyalty Repository
//!
//! Customer loyalty point balances. Accrual comes from the billing engine;
//! arbitrary deltas come from admin adjustments.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use exoticbill_core::LoyaltyAccount;

/// Repository for loyalty point operations.
#[derive(Debug, Clone)]
pub struct LoyaltyRepository {
    pool: SqlitePool,
}

impl LoyaltyRepository {
    /// Creates a new LoyaltyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LoyaltyRepository { pool }
    }

    /// Gets a customer's loyalty account, if one exists.
    pub async fn get(&self, customer_cid: &str) -> DbResult<Option<LoyaltyAccount>> {
        let account = sqlx::query_as::<_, LoyaltyAccount>(
            "SELECT customer_cid, points, updated_at FROM loyalty WHERE customer_cid = ?1",
        )
        .bind(customer_cid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Adds points to a customer's balance inside the caller's transaction,
    /// creating the account on first accrual.
    pub async fn accrue(
        conn: &mut SqliteConnection,
        customer_cid: &str,
        points: i64,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(customer = %customer_cid, points = %points, "Accruing loyalty points");

        sqlx::query(
            r#"
            INSERT INTO loyalty (customer_cid, points, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(customer_cid) DO UPDATE SET
                points = points + excluded.points,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(customer_cid)
        .bind(points)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Applies an arbitrary admin delta (may be negative).
    pub async fn adjust(&self, customer_cid: &str, delta: i64) -> DbResult<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO loyalty (customer_cid, points, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(customer_cid) DO UPDATE SET
                points = points + excluded.points,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(customer_cid)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Top accounts by point balance.
    pub async fn top(&self, limit: i64) -> DbResult<Vec<LoyaltyAccount>> {
        let accounts = sqlx::query_as::<_, LoyaltyAccount>(
            r#"
            SELECT customer_cid, points, updated_at FROM loyalty
            ORDER BY points DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }
}
