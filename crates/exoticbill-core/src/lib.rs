//! # exoticbill-core: Pure Business Logic for ExoticBill
//!
//! This crate is the **heart** of ExoticBill. Every billing rule lives here
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ExoticBill Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (external)                   │   │
//! │  │      collects sale parameters, renders totals and warnings      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    exoticbill-engine                            │   │
//! │  │    one transaction per sale: sweep, validate, compute, persist  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ exoticbill-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  billing  │  │   rates   │  │   │
//! │  │   │   Bill    │  │   Money   │  │  totals   │  │commission │  │   │
//! │  │   │ Employee  │  │  Decimal  │  │ discounts │  │ discounts │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    exoticbill-db (SQLite)                       │   │
//! │  │           migrations, repositories, connection pool             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Bill, Employee, Membership, ...)
//! - [`money`] - Exact-decimal Money type
//! - [`rates`] - Commission/discount/price tables and business constants
//! - [`billing`] - Pure sale computation (totals, discount, commission, tax)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod money;
pub mod rates;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use exoticbill_core::Money` instead of
// `use exoticbill_core::money::Money`

pub use billing::{
    AppliedDiscount, BillTotals, ItemSelection, PricedLine, SaleKind,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use rates::BillingConfig;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single ITEMS sale.
///
/// ## Business Reason
/// Prevents runaway selections and keeps one sale reviewable on a receipt.
pub const MAX_SALE_LINES: usize = 50;

/// Maximum quantity of a single item per line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
