//! # Engine Error Type
//!
//! Unified error taxonomy for engine operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Error Flow in ExoticBill                              │
//! │                                                                         │
//! │  Caller (presentation layer)                                            │
//! │       ▲                                                                 │
//! │       │  EngineError                                                    │
//! │  ┌────┴─────────────────────────────────────────────────────────────┐  │
//! │  │  Engine operation                                                │  │
//! │  │                                                                  │  │
//! │  │  Validation  → user-visible warning, NO mutation occurred        │  │
//! │  │  Conflict    → duplicate key / open shift, insert not attempted  │  │
//! │  │  NotFound    → target row vanished, caller may treat as no-op    │  │
//! │  │  Store       → I/O failure, fatal; never masked as success       │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  All validation happens before any write for a logical operation,      │
//! │  and the operation's transaction rolls back on every error path.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use exoticbill_core::CoreError;
use exoticbill_db::DbError;

/// Error returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// User input was malformed or a business rule rejected it before any
    /// write (missing CID, zero amount, quantity exceeds stock, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A unique key already exists (employee CID, hood name) or a state
    /// conflict blocks the operation (open shift already exists).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The target entity no longer exists.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Persistence-layer failure. Not recoverable locally; propagated as a
    /// fatal operation failure rather than swallowed into a false success.
    #[error("Store error: {0}")]
    Store(DbError),
}

impl EngineError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation(message.into())
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        EngineError::Conflict(message.into())
    }

    /// Creates a not found error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<exoticbill_core::ValidationError> for EngineError {
    fn from(err: exoticbill_core::ValidationError) -> Self {
        EngineError::Validation(err.to_string())
    }
}

/// Business rule violations map onto the caller taxonomy: missing entities
/// surface as NotFound, everything else as a validation warning.
impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmployeeNotFound(cid) => EngineError::not_found("Employee", cid),
            CoreError::ItemNotFound(name) => EngineError::not_found("Item", name),
            other => EngineError::Validation(other.to_string()),
        }
    }
}

/// Store errors keep their classification where the taxonomy has a finer
/// bucket (duplicates → Conflict, missing rows → NotFound).
impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { field, value } => {
                EngineError::Conflict(format!("duplicate {field}: '{value}'"))
            }
            DbError::NotFound { entity, id } => EngineError::NotFound { entity, id },
            other => EngineError::Store(other),
        }
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::from(DbError::from(err))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: EngineError = CoreError::EmployeeNotFound("EMP-1".into()).into();
        assert!(matches!(err, EngineError::NotFound { .. }));

        let err: EngineError = CoreError::InsufficientStock {
            item: "NOS".into(),
            available: 1,
            requested: 2,
        }
        .into();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_db_error_mapping() {
        let err: EngineError = DbError::duplicate("employees.cid", "EMP-1").into();
        assert!(matches!(err, EngineError::Conflict(_)));

        let err: EngineError = DbError::not_found("Bill", "b-1").into();
        assert!(matches!(err, EngineError::NotFound { .. }));

        let err: EngineError = DbError::QueryFailed("disk I/O error".into()).into();
        assert!(matches!(err, EngineError::Store(_)));
    }
}
