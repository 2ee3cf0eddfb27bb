//! # Shift Repository
//!
//! Open and closed work intervals. The partial UNIQUE index
//! `idx_shifts_open_employee` guarantees at most one open shift per employee
//! even if two starts race; the engine also pre-checks for a friendly error.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use exoticbill_core::{Money, Shift};

const SHIFT_COLUMNS: &str =
    "id, employee_cid, started_at, ended_at, duration_minutes, bills_count, revenue";

/// Repository for shift database operations.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    /// Gets a shift by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Gets an employee's open shift, if any.
    pub async fn open_for(&self, employee_cid: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE employee_cid = ?1 AND ended_at IS NULL"
        ))
        .bind(employee_cid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Opens a new shift.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the employee already has an open
    ///   shift (partial unique index)
    pub async fn insert_open(&self, shift: &Shift) -> DbResult<()> {
        debug!(id = %shift.id, employee = %shift.employee_cid, "Opening shift");

        sqlx::query(
            r#"
            INSERT INTO shifts (id, employee_cid, started_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&shift.id)
        .bind(&shift.employee_cid)
        .bind(shift.started_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Closes a shift, filling in the derived summary columns.
    pub async fn close(
        &self,
        id: &str,
        ended_at: DateTime<Utc>,
        duration_minutes: i64,
        bills_count: i64,
        revenue: Money,
    ) -> DbResult<()> {
        debug!(id = %id, duration_minutes = %duration_minutes, "Closing shift");

        let result = sqlx::query(
            r#"
            UPDATE shifts SET
                ended_at = ?2,
                duration_minutes = ?3,
                bills_count = ?4,
                revenue = ?5
            WHERE id = ?1 AND ended_at IS NULL
            "#,
        )
        .bind(id)
        .bind(ended_at)
        .bind(duration_minutes)
        .bind(bills_count)
        .bind(revenue)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Open shift", id));
        }

        Ok(())
    }

    /// Lists an employee's shifts, newest first.
    pub async fn list_for(&self, employee_cid: &str) -> DbResult<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE employee_cid = ?1 ORDER BY started_at DESC"
        ))
        .bind(employee_cid)
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }
}
