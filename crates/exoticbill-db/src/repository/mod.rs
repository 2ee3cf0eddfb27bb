//! # Repository Module
//!
//! Database repository implementations for ExoticBill.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Engine operation                                                       │
//! │       │                                                                 │
//! │       │  db.items().get("NOS")                                          │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ItemRepository                                                        │
//! │  ├── get(&self, name)              ← pool-backed simple reads          │
//! │  ├── insert(&self, item)                                               │
//! │  └── decrement_stock(conn, ...)    ← transaction-composable writes     │
//! │       │                                                                 │
//! │       │  Parameter-bound SQL                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Methods taking `&mut SqliteConnection` participate in the engine's    │
//! │  one-transaction-per-operation contract: the whole multi-step write    │
//! │  commits or rolls back as a unit.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`bill::BillRepository`] - Live and soft-deleted bills
//! - [`employee::EmployeeRepository`] - Employee CRUD
//! - [`item::ItemRepository`] - Catalog and stock
//! - [`membership::MembershipRepository`] - Active memberships + history
//! - [`loyalty::LoyaltyRepository`] - Point balances
//! - [`shift::ShiftRepository`] - Work intervals
//! - [`hood::HoodRepository`] - Team groupings
//! - [`audit::AuditRepository`] - Append-only audit trail

pub mod audit;
pub mod bill;
pub mod employee;
pub mod hood;
pub mod item;
pub mod loyalty;
pub mod membership;
pub mod shift;
