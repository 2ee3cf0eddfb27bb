//! # Rate Tables
//!
//! Every static business rate in one place: commission by rank, membership
//! discounts by tier and billing type, tier prices, and the fixed charges
//! used by the repair/upgrade/customization formulas.
//!
//! These tables are the single source of truth for the billing engine; no
//! other module hard-codes a rate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::money::Money;
use crate::types::{BillingType, EmployeeRank, MembershipTier};

// =============================================================================
// Fixed Charges & Multipliers
// =============================================================================

/// Labor charge added to every standard repair.
pub const REPAIR_LABOR_CHARGE: Decimal = dec!(450);

/// Per-part cost for advanced repairs.
pub const REPAIR_PART_COST: Decimal = dec!(250);

/// Upgrades bill at base × 1.5.
pub const UPGRADE_MULTIPLIER: Decimal = dec!(1.5);

/// Customization bills at base × 2.
pub const CUSTOMIZATION_MULTIPLIER: Decimal = dec!(2);

/// Tax charged on commission (not on the bill total).
pub const COMMISSION_TAX_RATE: Decimal = dec!(0.05);

/// Items that never generate commission, even for commissioned ranks.
pub const NO_COMMISSION_ITEMS: [&str; 2] = ["Harness", "NOS"];

/// Active membership lifetime in days.
pub const MEMBERSHIP_DURATION_DAYS: i64 = 7;

/// Default loyalty accrual: 1 point per ₹100 of non-membership spend.
pub const DEFAULT_LOYALTY_EARN_PER_RS: Decimal = dec!(100);

/// Hood assigned to employees without a team.
pub const UNASSIGNED_HOOD: &str = "unassigned";

// =============================================================================
// Commission Rates
// =============================================================================

impl EmployeeRank {
    /// Commission rate for this rank, as a fraction of the final bill total.
    pub const fn commission_rate(&self) -> Decimal {
        match self {
            EmployeeRank::Trainee => dec!(0.10),
            EmployeeRank::Mechanic => dec!(0.15),
            EmployeeRank::SeniorMechanic => dec!(0.18),
            EmployeeRank::LeadUpgradeSpecialist => dec!(0.20),
            EmployeeRank::StockManager => dec!(0.15),
            EmployeeRank::Manager => dec!(0.25),
            EmployeeRank::Ceo => dec!(0.69),
        }
    }
}

// =============================================================================
// Membership Discounts & Prices
// =============================================================================

impl MembershipTier {
    /// Discount rate this tier grants on the given billing type.
    ///
    /// Only REPAIR and CUSTOMIZATION are ever discounted; every other type
    /// returns zero for every tier, as does `Racer` for everything.
    pub const fn discount_rate(&self, billing_type: BillingType) -> Decimal {
        match (self, billing_type) {
            (MembershipTier::Tier1, BillingType::Repair) => dec!(0.20),
            (MembershipTier::Tier1, BillingType::Customization) => dec!(0.10),
            (MembershipTier::Tier2, BillingType::Repair) => dec!(0.33),
            (MembershipTier::Tier2, BillingType::Customization) => dec!(0.20),
            (MembershipTier::Tier3, BillingType::Repair) => dec!(0.50),
            (MembershipTier::Tier3, BillingType::Customization) => dec!(0.30),
            _ => Decimal::ZERO,
        }
    }

    /// Purchase price of this tier. `Racer` is free.
    pub fn price(&self) -> Money {
        match self {
            MembershipTier::Tier1 => Money::from_rupees(5000),
            MembershipTier::Tier2 => Money::from_rupees(10000),
            MembershipTier::Tier3 => Money::from_rupees(20000),
            MembershipTier::Racer => Money::ZERO,
        }
    }

    /// True for the free tier, which records no bill on purchase.
    #[inline]
    pub const fn is_free(&self) -> bool {
        matches!(self, MembershipTier::Racer)
    }
}

// =============================================================================
// Billing Configuration
// =============================================================================

/// Tunable billing constants, passed into the engine.
///
/// Defaults match production behavior; tests may tighten the membership
/// window or change the loyalty rate without touching the rate tables.
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Currency units per loyalty point (points = floor(total / this)).
    pub loyalty_earn_per_rs: Decimal,
    /// Days a membership stays active after purchase.
    pub membership_days: i64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        BillingConfig {
            loyalty_earn_per_rs: DEFAULT_LOYALTY_EARN_PER_RS,
            membership_days: MEMBERSHIP_DURATION_DAYS,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_rates() {
        assert_eq!(EmployeeRank::Trainee.commission_rate(), dec!(0.10));
        assert_eq!(EmployeeRank::Manager.commission_rate(), dec!(0.25));
        assert_eq!(EmployeeRank::Ceo.commission_rate(), dec!(0.69));
        // Stock managers earn the same cut as mechanics
        assert_eq!(
            EmployeeRank::StockManager.commission_rate(),
            EmployeeRank::Mechanic.commission_rate()
        );
    }

    #[test]
    fn test_discount_table() {
        use BillingType::*;
        use MembershipTier::*;

        assert_eq!(Tier1.discount_rate(Repair), dec!(0.20));
        assert_eq!(Tier2.discount_rate(Repair), dec!(0.33));
        assert_eq!(Tier3.discount_rate(Customization), dec!(0.30));
        // No tier discounts anything except repair/customization
        assert_eq!(Tier3.discount_rate(Items), Decimal::ZERO);
        assert_eq!(Tier3.discount_rate(Upgrades), Decimal::ZERO);
        assert_eq!(Tier3.discount_rate(Membership), Decimal::ZERO);
        // Racer never discounts
        assert_eq!(Racer.discount_rate(Repair), Decimal::ZERO);
        assert_eq!(Racer.discount_rate(Customization), Decimal::ZERO);
    }

    #[test]
    fn test_tier_prices() {
        assert_eq!(MembershipTier::Tier1.price(), Money::from_rupees(5000));
        assert!(MembershipTier::Racer.price().is_zero());
        assert!(MembershipTier::Racer.is_free());
        assert!(!MembershipTier::Tier3.is_free());
    }
}
