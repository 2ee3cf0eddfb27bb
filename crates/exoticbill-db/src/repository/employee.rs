//! # Employee Repository
//!
//! Database operations for employees. Rank mutations matter: the rank row
//! value drives the commission rate at sale time, so edits here change what
//! future bills pay out (existing bills are never recomputed).

use chrono::Utc;
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use exoticbill_core::rates::UNASSIGNED_HOOD;
use exoticbill_core::Employee;

const EMPLOYEE_COLUMNS: &str =
    "cid, name, rank, hood, username, password_hash, created_at, updated_at";

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Gets an employee by CID.
    pub async fn get(&self, cid: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE cid = ?1"
        ))
        .bind(cid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Gets an employee by CID inside the caller's transaction.
    pub async fn fetch(conn: &mut SqliteConnection, cid: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE cid = ?1"
        ))
        .bind(cid)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(employee)
    }

    /// Lists all employees, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Lists employees in one hood.
    pub async fn list_by_hood(&self, hood: &str) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE hood = ?1 ORDER BY name"
        ))
        .bind(hood)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Inserts a new employee.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - CID (or username) already exists
    pub async fn insert(&self, employee: &Employee) -> DbResult<()> {
        debug!(cid = %employee.cid, "Inserting employee");

        sqlx::query(
            r#"
            INSERT INTO employees (
                cid, name, rank, hood, username, password_hash,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&employee.cid)
        .bind(&employee.name)
        .bind(employee.rank)
        .bind(&employee.hood)
        .bind(&employee.username)
        .bind(&employee.password_hash)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing employee.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - CID doesn't exist
    pub async fn update(&self, employee: &Employee) -> DbResult<()> {
        debug!(cid = %employee.cid, "Updating employee");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE employees SET
                name = ?2,
                rank = ?3,
                hood = ?4,
                username = ?5,
                password_hash = ?6,
                updated_at = ?7
            WHERE cid = ?1
            "#,
        )
        .bind(&employee.cid)
        .bind(&employee.name)
        .bind(employee.rank)
        .bind(&employee.hood)
        .bind(&employee.username)
        .bind(&employee.password_hash)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", &employee.cid));
        }

        Ok(())
    }

    /// Removes an employee.
    pub async fn delete(&self, cid: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE cid = ?1")
            .bind(cid)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", cid));
        }

        Ok(())
    }

    /// Moves every employee of a hood back to the unassigned pool.
    /// Called when a hood is removed.
    pub async fn clear_hood(&self, hood: &str) -> DbResult<u64> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE employees SET hood = ?2, updated_at = ?3 WHERE hood = ?1",
        )
        .bind(hood)
        .bind(UNASSIGNED_HOOD)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
