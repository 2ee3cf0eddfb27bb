//! # Bill Repository
//!
//! Database operations for live and soft-deleted bills.
//!
//! ## Bill Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bill Lifecycle                                    │
//! │                                                                         │
//! │  1. INSERT (inside the engine's sale transaction)                       │
//! │     └── insert() → row in `bills`                                       │
//! │                                                                         │
//! │  2. (OPTIONAL) SOFT DELETE                                              │
//! │     └── soft_delete() → row moves to `bills_deleted` with deleter       │
//! │         identity + deletion time; never hard-deleted                    │
//! │                                                                         │
//! │  3. (DESTRUCTIVE, CONFIRMED) RESET                                      │
//! │     └── reset_all() → wipes both tables; gated by the engine            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use exoticbill_core::{Bill, DeletedBill};

const BILL_COLUMNS: &str =
    "id, employee_cid, customer_cid, billing_type, details, total, commission, tax, created_at";

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Gets a bill by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Bill>> {
        let bill = sqlx::query_as::<_, Bill>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Lists bills, optionally filtered by employee and/or time window,
    /// newest first.
    ///
    /// Timestamps are compared through `datetime()` so textual precision
    /// differences cannot skew the window.
    pub async fn list_filtered(
        &self,
        employee_cid: Option<&str>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<Bill>> {
        let mut sql = format!("SELECT {BILL_COLUMNS} FROM bills WHERE 1=1");
        if employee_cid.is_some() {
            sql.push_str(" AND employee_cid = ?");
        }
        if since.is_some() {
            sql.push_str(" AND datetime(created_at) >= datetime(?)");
        }
        if until.is_some() {
            sql.push_str(" AND datetime(created_at) <= datetime(?)");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, Bill>(&sql);
        if let Some(cid) = employee_cid {
            query = query.bind(cid.to_string());
        }
        if let Some(t) = since {
            query = query.bind(t);
        }
        if let Some(t) = until {
            query = query.bind(t);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Gets a bill by ID inside the caller's transaction.
    ///
    /// Soft-delete reads through the same transaction that will move the
    /// row, so the bill cannot change between read and move.
    pub async fn fetch(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Bill>> {
        let bill = sqlx::query_as::<_, Bill>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(bill)
    }

    /// Inserts a bill inside the caller's transaction.
    pub async fn insert(conn: &mut SqliteConnection, bill: &Bill) -> DbResult<()> {
        debug!(id = %bill.id, billing_type = %bill.billing_type, "Inserting bill");

        sqlx::query(
            r#"
            INSERT INTO bills (
                id, employee_cid, customer_cid, billing_type, details,
                total, commission, tax, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&bill.id)
        .bind(&bill.employee_cid)
        .bind(&bill.customer_cid)
        .bind(bill.billing_type)
        .bind(&bill.details)
        .bind(bill.total)
        .bind(bill.commission)
        .bind(bill.tax)
        .bind(bill.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Moves a bill to the deleted-bills table inside the caller's
    /// transaction.
    ///
    /// ## Why Soft Delete?
    /// Erroneous deletions stay recoverable and auditable: the full original
    /// row is preserved alongside the deleter identity and deletion time.
    pub async fn soft_delete(
        conn: &mut SqliteConnection,
        bill: &Bill,
        deleted_by: &str,
        deleted_at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(id = %bill.id, deleted_by = %deleted_by, "Soft-deleting bill");

        sqlx::query(
            r#"
            INSERT INTO bills_deleted (
                id, employee_cid, customer_cid, billing_type, details,
                total, commission, tax, created_at, deleted_by, deleted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&bill.id)
        .bind(&bill.employee_cid)
        .bind(&bill.customer_cid)
        .bind(bill.billing_type)
        .bind(&bill.details)
        .bind(bill.total)
        .bind(bill.commission)
        .bind(bill.tax)
        .bind(bill.created_at)
        .bind(deleted_by)
        .bind(deleted_at)
        .execute(&mut *conn)
        .await?;

        let result = sqlx::query("DELETE FROM bills WHERE id = ?1")
            .bind(&bill.id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Bill", &bill.id));
        }

        Ok(())
    }

    /// Gets a soft-deleted bill by ID.
    pub async fn get_deleted(&self, id: &str) -> DbResult<Option<DeletedBill>> {
        let bill = sqlx::query_as::<_, DeletedBill>(&format!(
            "SELECT {BILL_COLUMNS}, deleted_by, deleted_at FROM bills_deleted WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Counts live bills.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Wipes the entire billing history, live and deleted.
    ///
    /// Destructive and irreversible; the engine gates this behind an explicit
    /// confirmation flag.
    pub async fn reset_all(conn: &mut SqliteConnection) -> DbResult<u64> {
        let live = sqlx::query("DELETE FROM bills").execute(&mut *conn).await?;
        let deleted = sqlx::query("DELETE FROM bills_deleted")
            .execute(&mut *conn)
            .await?;

        Ok(live.rows_affected() + deleted.rows_affected())
    }
}
