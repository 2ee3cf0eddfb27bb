//! # Audit Log Repository
//!
//! Append-only audit trail. Writes happen after the primary transaction
//! commits and are never allowed to fail the operation they describe; the
//! engine logs and swallows append errors.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use exoticbill_core::AuditEntry;

/// Repository for audit log operations.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
}

impl AuditRepository {
    /// Creates a new AuditRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AuditRepository { pool }
    }

    /// Appends one audit entry.
    ///
    /// `old_values`/`new_values` are JSON snapshots of the affected row
    /// before and after the mutation; either side may be absent (creation
    /// has no before, deletion has no after).
    #[allow(clippy::too_many_arguments)]
    pub async fn append(
        &self,
        action: &str,
        table_name: &str,
        row_id: &str,
        actor: &str,
        old_values: Option<&serde_json::Value>,
        new_values: Option<&serde_json::Value>,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (
                action, table_name, row_id, actor, old_values, new_values, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(action)
        .bind(table_name)
        .bind(row_id)
        .bind(actor)
        .bind(old_values.map(|v| v.to_string()))
        .bind(new_values.map(|v| v.to_string()))
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent audit entries, newest first.
    pub async fn recent(&self, limit: i64) -> DbResult<Vec<AuditEntry>> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT id, action, table_name, row_id, actor, old_values, new_values, created_at
            FROM audit_log
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Audit entries for one row of one table, oldest first.
    pub async fn for_row(&self, table_name: &str, row_id: &str) -> DbResult<Vec<AuditEntry>> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT id, action, table_name, row_id, actor, old_values, new_values, created_at
            FROM audit_log
            WHERE table_name = ?1 AND row_id = ?2
            ORDER BY id
            "#,
        )
        .bind(table_name)
        .bind(row_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
