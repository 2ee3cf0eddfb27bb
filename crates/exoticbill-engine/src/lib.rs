//! # exoticbill-engine: Billing Engine for ExoticBill
//!
//! The orchestration layer: every logical operation is one scoped SQLite
//! transaction composed from `exoticbill-core` (pure rules) and
//! `exoticbill-db` (storage).
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ExoticBill Engine                                   │
//! │                                                                         │
//! │  Caller (presentation layer, excluded from this system)                │
//! │       │  raw sale parameters / admin commands                          │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                BillingEngine (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │  save_bill ──────── one transaction: sweep → validate →         │   │
//! │  │                     compute → bill + stock + loyalty +          │   │
//! │  │                     membership, commit-or-rollback              │   │
//! │  │  start/end_shift ── open-interval tracking + derived summary    │   │
//! │  │  soft_delete_bill ─ move to bills_deleted, audited              │   │
//! │  │  billing_summary ── exact-decimal read-side aggregation         │   │
//! │  │  record_audit ───── fire-and-forget, after the primary commit   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  exoticbill-db → SQLite (sole durable owner of all state)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use exoticbill_db::{Database, DbConfig};
//! use exoticbill_engine::{BillingEngine, SaleRequest};
//! use exoticbill_core::SaleKind;
//!
//! let db = Database::new(DbConfig::new("./exoticbill.db")).await?;
//! let engine = BillingEngine::new(db);
//!
//! let outcome = engine
//!     .save_bill(SaleRequest::new(
//!         "EMP-1042",
//!         SaleKind::RepairStandard { base: Money::from_rupees(1000) },
//!     ))
//!     .await?;
//! println!("total {}", outcome.total);
//! ```

use exoticbill_core::BillingConfig;
use exoticbill_db::Database;

// =============================================================================
// Module Declarations
// =============================================================================

pub mod admin;
pub mod audit;
pub mod billing;
pub mod error;
pub mod membership;
pub mod shift;
pub mod summary;

// =============================================================================
// Re-exports
// =============================================================================

pub use admin::NewEmployee;
pub use billing::{SaleOutcome, SaleRequest};
pub use error::{EngineError, EngineResult};
pub use summary::{BillingSummary, HoodStanding, TypeBreakdown};

// =============================================================================
// Engine
// =============================================================================

/// The billing rule engine: a stateless transformer over the store.
///
/// Cloneable and cheap to share; all state lives in the database.
#[derive(Debug, Clone)]
pub struct BillingEngine {
    pub(crate) db: Database,
    pub(crate) config: BillingConfig,
}

impl BillingEngine {
    /// Creates an engine with production billing constants.
    pub fn new(db: Database) -> Self {
        BillingEngine {
            db,
            config: BillingConfig::default(),
        }
    }

    /// Creates an engine with custom billing constants (tests mostly).
    pub fn with_config(db: Database, config: BillingConfig) -> Self {
        BillingEngine { db, config }
    }

    /// The underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The active billing configuration.
    pub fn config(&self) -> &BillingConfig {
        &self.config
    }
}
