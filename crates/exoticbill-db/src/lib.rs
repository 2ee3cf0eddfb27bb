//! # exoticbill-db: Database Layer for ExoticBill
//!
//! This crate provides database access for the ExoticBill system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ExoticBill Data Flow                             │
//! │                                                                         │
//! │  Engine operation (save_bill, start_shift, ...)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   exoticbill-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (bill.rs,    │    │  (embedded)  │  │   │
//! │  │   │               │    │   item.rs,..) │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ BillRepo      │    │ 001_init.sql │  │   │
//! │  │   │ WAL + FK on   │    │ ItemRepo ...  │    │ 002_idx.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (single embedded file, sole durable owner of state)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, configuration and bootstrap
//! - [`migrations`] - Embedded database migrations
//! - [`seed`] - First-boot catalog seeding
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use exoticbill_db::{Database, DbConfig};
//!
//! // Create database with default config (migrates and seeds on connect)
//! let db = Database::new(DbConfig::new("path/to/exoticbill.db")).await?;
//!
//! // Use repositories
//! let items = db.items().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::audit::AuditRepository;
pub use repository::bill::BillRepository;
pub use repository::employee::EmployeeRepository;
pub use repository::hood::HoodRepository;
pub use repository::item::ItemRepository;
pub use repository::loyalty::LoyaltyRepository;
pub use repository::membership::MembershipRepository;
pub use repository::shift::ShiftRepository;
