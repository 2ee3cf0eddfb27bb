//! # Domain Types
//!
//! Core domain types used throughout ExoticBill.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Bill       │   │    Employee     │   │   Membership    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  cid (business) │   │  customer_cid   │       │
//! │  │  billing_type   │   │  rank           │   │  tier           │       │
//! │  │  total/comm/tax │   │  hood           │   │  purchased_at   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   BillingType   │   │  EmployeeRank   │   │ MembershipTier  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Items          │   │  Trainee..Ceo   │   │  Tier1..Tier3   │       │
//! │  │  Upgrades       │   │  (drives the    │   │  Racer          │       │
//! │  │  Repair         │   │   commission    │   │  (drives the    │       │
//! │  │  Customization  │   │   rate)         │   │   discount)     │       │
//! │  │  Membership     │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Billing Type
// =============================================================================

/// The category of a sale. Stored as TEXT (`ITEMS`, `UPGRADES`, ...).
///
/// A closed enum, never a free string: the commission and discount rules
/// branch on this and must not depend on display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum BillingType {
    /// Catalog items with stock tracking.
    Items,
    /// Vehicle upgrades, billed at base × 1.5.
    Upgrades,
    /// Repairs, standard (base + labor) or advanced (per part).
    Repair,
    /// Customization work, billed at base × 2.
    Customization,
    /// Membership purchase.
    Membership,
}

impl fmt::Display for BillingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BillingType::Items => "ITEMS",
            BillingType::Upgrades => "UPGRADES",
            BillingType::Repair => "REPAIR",
            BillingType::Customization => "CUSTOMIZATION",
            BillingType::Membership => "MEMBERSHIP",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Employee Rank
// =============================================================================

/// Employee rank. Determines the commission percentage via a static lookup
/// (see [`crate::rates`]). Stored as the variant name (`SeniorMechanic`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum EmployeeRank {
    Trainee,
    Mechanic,
    SeniorMechanic,
    LeadUpgradeSpecialist,
    StockManager,
    Manager,
    Ceo,
}

impl fmt::Display for EmployeeRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EmployeeRank::Trainee => "Trainee",
            EmployeeRank::Mechanic => "Mechanic",
            EmployeeRank::SeniorMechanic => "Senior Mechanic",
            EmployeeRank::LeadUpgradeSpecialist => "Lead Upgrade Specialist",
            EmployeeRank::StockManager => "Stock Manager",
            EmployeeRank::Manager => "Manager",
            EmployeeRank::Ceo => "CEO",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Membership Tier
// =============================================================================

/// Membership level granting recurring discounts on REPAIR/CUSTOMIZATION
/// sales for 7 days from purchase. `Racer` is free and carries no discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum MembershipTier {
    Tier1,
    Tier2,
    Tier3,
    Racer,
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MembershipTier::Tier1 => "Tier1",
            MembershipTier::Tier2 => "Tier2",
            MembershipTier::Tier3 => "Tier3",
            MembershipTier::Racer => "Racer",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Bill
// =============================================================================

/// A finalized, persisted sale.
///
/// Invariant: `commission` and `tax` are zero whenever `billing_type` is
/// UPGRADES or MEMBERSHIP, or when an ITEMS sale contains only
/// no-commission items. The billing engine is the only writer and enforces
/// this before the row ever exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Bill {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// CID of the employee who made the sale.
    pub employee_cid: String,
    /// CID of the customer; absent for walk-ins without a profile.
    pub customer_cid: Option<String>,
    pub billing_type: BillingType,
    /// Human-readable description of what was sold. Display-only: the rule
    /// engine never parses this back.
    pub details: String,
    pub total: Money,
    pub commission: Money,
    pub tax: Money,
    pub created_at: DateTime<Utc>,
}

/// A soft-deleted bill: the original row plus deletion metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DeletedBill {
    pub id: String,
    pub employee_cid: String,
    pub customer_cid: Option<String>,
    pub billing_type: BillingType,
    pub details: String,
    pub total: Money,
    pub commission: Money,
    pub tax: Money,
    pub created_at: DateTime<Utc>,
    /// Actor who deleted the bill (audit attribution).
    pub deleted_by: String,
    pub deleted_at: DateTime<Utc>,
}

// =============================================================================
// Employee
// =============================================================================

/// An employee. `cid` is the business identifier used across bills, shifts
/// and audit attribution.
///
/// The credential pair is optional and managed externally; this system only
/// stores it, never derives or issues it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    pub cid: String,
    pub name: String,
    pub rank: EmployeeRank,
    /// Team/territory assignment; `"unassigned"` when none.
    pub hood: String,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Item
// =============================================================================

/// A catalog item with a unit price and tracked stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    pub name: String,
    pub price: Money,
    /// Current stock level, never negative.
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Checks whether a requested quantity can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && self.stock >= quantity
    }
}

// =============================================================================
// Membership
// =============================================================================

/// An active membership. At most one row per customer; expired rows move to
/// [`MembershipRecord`] via the expiry sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Membership {
    pub customer_cid: String,
    pub tier: MembershipTier,
    pub purchased_at: DateTime<Utc>,
}

impl Membership {
    /// The instant this membership stops being active.
    pub fn expires_at(&self, duration_days: i64) -> DateTime<Utc> {
        self.purchased_at + Duration::days(duration_days)
    }
}

/// An archived membership, append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MembershipRecord {
    pub id: i64,
    pub customer_cid: String,
    pub tier: MembershipTier,
    pub purchased_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

// =============================================================================
// Loyalty
// =============================================================================

/// A customer's loyalty point balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LoyaltyAccount {
    pub customer_cid: String,
    pub points: i64,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Shift
// =============================================================================

/// A bounded work interval for one employee.
///
/// `ended_at == None` marks the open interval; the derived columns are
/// filled in when the shift closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: String,
    pub employee_cid: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub bills_count: Option<i64>,
    pub revenue: Option<Money>,
}

impl Shift {
    /// True while the shift has not been closed.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

// =============================================================================
// Hood
// =============================================================================

/// A named team/territory grouping of employees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Hood {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Audit
// =============================================================================

/// One append-only audit trail entry. The snapshot columns hold JSON text of
/// the affected row before and after the mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AuditEntry {
    pub id: i64,
    pub action: String,
    pub table_name: String,
    pub row_id: String,
    pub actor: String,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_billing_type_display() {
        assert_eq!(BillingType::Items.to_string(), "ITEMS");
        assert_eq!(BillingType::Customization.to_string(), "CUSTOMIZATION");
    }

    #[test]
    fn test_rank_display_labels() {
        assert_eq!(EmployeeRank::SeniorMechanic.to_string(), "Senior Mechanic");
        assert_eq!(EmployeeRank::Ceo.to_string(), "CEO");
    }

    #[test]
    fn test_membership_expiry_instant() {
        let purchased = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let membership = Membership {
            customer_cid: "C100".into(),
            tier: MembershipTier::Tier2,
            purchased_at: purchased,
        };
        assert_eq!(
            membership.expires_at(7),
            Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_item_can_sell() {
        let now = Utc::now();
        let item = Item {
            name: "NOS".into(),
            price: Money::from_rupees(1500),
            stock: 2,
            created_at: now,
            updated_at: now,
        };
        assert!(item.can_sell(2));
        assert!(!item.can_sell(3));
        assert!(!item.can_sell(0));
    }
}
