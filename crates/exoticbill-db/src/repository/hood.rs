//! # Hood Repository
//!
//! Named team/territory groupings for leaderboard aggregation.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use exoticbill_core::Hood;

/// Repository for hood database operations.
#[derive(Debug, Clone)]
pub struct HoodRepository {
    pool: SqlitePool,
}

impl HoodRepository {
    /// Creates a new HoodRepository.
    pub fn new(pool: SqlitePool) -> Self {
        HoodRepository { pool }
    }

    /// Gets a hood by name.
    pub async fn get(&self, name: &str) -> DbResult<Option<Hood>> {
        let hood = sqlx::query_as::<_, Hood>(
            "SELECT name, created_at FROM hoods WHERE name = ?1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hood)
    }

    /// Lists all hoods, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Hood>> {
        let hoods = sqlx::query_as::<_, Hood>("SELECT name, created_at FROM hoods ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(hoods)
    }

    /// Inserts a new hood.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - hood name already exists
    pub async fn insert(&self, name: &str) -> DbResult<()> {
        let now = Utc::now();

        sqlx::query("INSERT INTO hoods (name, created_at) VALUES (?1, ?2)")
            .bind(name)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Removes a hood. Member employees are reassigned by the caller.
    pub async fn delete(&self, name: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM hoods WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Hood", name));
        }

        Ok(())
    }
}
