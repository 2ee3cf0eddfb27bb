//! # Membership Repository
//!
//! Active memberships and the append-only expiry archive.
//!
//! ## Move Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  memberships (active, ≤1 per customer)                                  │
//! │       │                                                                 │
//! │       │ purchased_at ≤ now − 7 days                                     │
//! │       ▼                                                                 │
//! │  membership_history (append-only, expired_at = purchased_at + 7 days)   │
//! │                                                                         │
//! │  A membership is never lost, only relocated.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use exoticbill_core::{Membership, MembershipRecord};

/// Repository for membership database operations.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: SqlitePool,
}

impl MembershipRepository {
    /// Creates a new MembershipRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MembershipRepository { pool }
    }

    /// Gets a customer's active membership, if any.
    ///
    /// Callers that need expiry correctness must run the sweep first; the
    /// engine does both inside one transaction.
    pub async fn get(&self, customer_cid: &str) -> DbResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            "SELECT customer_cid, tier, purchased_at FROM memberships WHERE customer_cid = ?1",
        )
        .bind(customer_cid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    /// Gets a customer's active membership inside the caller's transaction.
    pub async fn fetch(
        conn: &mut SqliteConnection,
        customer_cid: &str,
    ) -> DbResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            "SELECT customer_cid, tier, purchased_at FROM memberships WHERE customer_cid = ?1",
        )
        .bind(customer_cid)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(membership)
    }

    /// Creates or replaces a customer's active membership.
    ///
    /// At most one active row per customer: a repurchase overwrites the tier
    /// and restarts the clock.
    pub async fn upsert(conn: &mut SqliteConnection, membership: &Membership) -> DbResult<()> {
        debug!(
            customer = %membership.customer_cid,
            tier = %membership.tier,
            "Upserting membership"
        );

        sqlx::query(
            r#"
            INSERT INTO memberships (customer_cid, tier, purchased_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(customer_cid) DO UPDATE SET
                tier = excluded.tier,
                purchased_at = excluded.purchased_at
            "#,
        )
        .bind(&membership.customer_cid)
        .bind(membership.tier)
        .bind(membership.purchased_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Moves every membership past its lifetime into the history table.
    ///
    /// A membership purchased at `T` is active through `T + duration` and
    /// expired at any instant ≥ `T + duration`; its archive row records
    /// `expired_at = T + duration` regardless of when the sweep ran.
    ///
    /// ## Returns
    /// Number of memberships expired.
    pub async fn sweep_expired(
        conn: &mut SqliteConnection,
        now: DateTime<Utc>,
        duration_days: i64,
    ) -> DbResult<u64> {
        let cutoff = now - Duration::days(duration_days);

        let expired = sqlx::query_as::<_, Membership>(
            r#"
            SELECT customer_cid, tier, purchased_at FROM memberships
            WHERE datetime(purchased_at) <= datetime(?1)
            "#,
        )
        .bind(cutoff)
        .fetch_all(&mut *conn)
        .await?;

        let mut moved = 0u64;

        for membership in expired {
            let expired_at = membership.purchased_at + Duration::days(duration_days);

            sqlx::query(
                r#"
                INSERT INTO membership_history (customer_cid, tier, purchased_at, expired_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&membership.customer_cid)
            .bind(membership.tier)
            .bind(membership.purchased_at)
            .bind(expired_at)
            .execute(&mut *conn)
            .await?;

            sqlx::query("DELETE FROM memberships WHERE customer_cid = ?1")
                .bind(&membership.customer_cid)
                .execute(&mut *conn)
                .await?;

            moved += 1;
        }

        if moved > 0 {
            debug!(count = moved, "Expired memberships moved to history");
        }

        Ok(moved)
    }

    /// Lists a customer's expired memberships, newest first.
    pub async fn history_for(&self, customer_cid: &str) -> DbResult<Vec<MembershipRecord>> {
        let records = sqlx::query_as::<_, MembershipRecord>(
            r#"
            SELECT id, customer_cid, tier, purchased_at, expired_at
            FROM membership_history
            WHERE customer_cid = ?1
            ORDER BY expired_at DESC
            "#,
        )
        .bind(customer_cid)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Counts active memberships.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM memberships")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
