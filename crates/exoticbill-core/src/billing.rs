//! # Billing Computation
//!
//! Pure functions computing what a sale costs and what it pays out.
//!
//! ## Computation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Sale, Start To Finish                            │
//! │                                                                         │
//! │  SaleKind (typed input)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  raw total        Items: Σ(price × qty)   Repair: base + ₹450 labor    │
//! │       │           Upgrades: base × 1.5    Advanced: parts × ₹250       │
//! │       │           Customization: base × 2 Membership: tier price       │
//! │       ▼                                                                 │
//! │  discount step    REPAIR/CUSTOMIZATION only, active membership only:   │
//! │       │           total ×= (1 − tier_rate[type])                       │
//! │       ▼                                                                 │
//! │  commission step  zero for UPGRADES/MEMBERSHIP and all-exempt ITEMS,   │
//! │       │           else total × rank_rate; tax = commission × 0.05      │
//! │       ▼                                                                 │
//! │  BillTotals { total, discount, commission, tax }                        │
//! │                                                                         │
//! │  NO I/O HAPPENS HERE. The engine loads state, calls in, persists out.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::rates::{
    BillingConfig, COMMISSION_TAX_RATE, CUSTOMIZATION_MULTIPLIER, NO_COMMISSION_ITEMS,
    REPAIR_LABOR_CHARGE, REPAIR_PART_COST, UPGRADE_MULTIPLIER,
};
use crate::types::{BillingType, EmployeeRank, MembershipTier};

// =============================================================================
// Sale Inputs
// =============================================================================

/// One requested line of an ITEMS sale: item name plus quantity.
///
/// Selections stay structured from request through the commission check;
/// they are never round-tripped through the display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSelection {
    pub name: String,
    pub quantity: i64,
}

impl ItemSelection {
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        ItemSelection {
            name: name.into(),
            quantity,
        }
    }
}

/// What is being sold, as a closed tagged variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SaleKind {
    /// Catalog items; quantities are validated against stock before any write.
    Items { lines: Vec<ItemSelection> },
    /// Upgrade work on a base amount.
    Upgrades { base: Money },
    /// Standard repair: base charge plus fixed labor.
    RepairStandard { base: Money },
    /// Advanced repair: billed per replaced part.
    RepairAdvanced { parts: i64 },
    /// Customization work on a base amount.
    Customization { base: Money },
    /// Membership purchase for a tier.
    Membership { tier: MembershipTier },
}

impl SaleKind {
    /// The billing type recorded on the resulting bill.
    pub const fn billing_type(&self) -> BillingType {
        match self {
            SaleKind::Items { .. } => BillingType::Items,
            SaleKind::Upgrades { .. } => BillingType::Upgrades,
            SaleKind::RepairStandard { .. } | SaleKind::RepairAdvanced { .. } => {
                BillingType::Repair
            }
            SaleKind::Customization { .. } => BillingType::Customization,
            SaleKind::Membership { .. } => BillingType::Membership,
        }
    }
}

/// A priced ITEMS line after catalog lookup: what the engine feeds back into
/// the total computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl PricedLine {
    /// Line total: unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Raw Totals
// =============================================================================

/// Raw ITEMS total: Σ(unit price × quantity).
pub fn items_total(lines: &[PricedLine]) -> Money {
    lines.iter().map(PricedLine::line_total).sum()
}

/// Raw UPGRADES total: base × 1.5.
#[inline]
pub fn upgrades_total(base: Money) -> Money {
    base * UPGRADE_MULTIPLIER
}

/// Raw standard REPAIR total: base charge + fixed labor.
#[inline]
pub fn repair_standard_total(base: Money) -> Money {
    base + Money::new(REPAIR_LABOR_CHARGE)
}

/// Raw advanced REPAIR total: parts × per-part cost.
#[inline]
pub fn repair_advanced_total(parts: i64) -> Money {
    Money::new(REPAIR_PART_COST) * parts
}

/// Raw CUSTOMIZATION total: base × 2.
#[inline]
pub fn customization_total(base: Money) -> Money {
    base * CUSTOMIZATION_MULTIPLIER
}

// =============================================================================
// Discount / Commission / Tax
// =============================================================================

/// The discount applied to a bill, for display and auditing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub tier: MembershipTier,
    pub rate: Decimal,
}

/// The finalized monetary outcome of one sale.
#[derive(Debug, Clone, PartialEq)]
pub struct BillTotals {
    /// Total before any membership discount.
    pub raw_total: Money,
    /// Final chargeable amount.
    pub total: Money,
    /// Membership discount, if one applied.
    pub discount: Option<AppliedDiscount>,
    pub commission: Money,
    pub tax: Money,
}

/// True when every selected item is in the no-commission set.
///
/// An empty selection is not exempt; it is rejected by validation upstream.
pub fn all_commission_exempt(lines: &[ItemSelection]) -> bool {
    !lines.is_empty()
        && lines
            .iter()
            .all(|line| NO_COMMISSION_ITEMS.contains(&line.name.as_str()))
}

/// Runs the discount and commission/tax steps over a raw total.
///
/// * `membership` — the customer's active tier, if any (the caller must have
///   swept expired memberships first).
/// * `exempt_items` — for ITEMS sales, whether every selected item is
///   commission-exempt; ignored for every other type.
pub fn finalize(
    raw_total: Money,
    billing_type: BillingType,
    membership: Option<MembershipTier>,
    rank: EmployeeRank,
    exempt_items: bool,
) -> BillTotals {
    // Discount step: repair/customization only, and only when the active
    // tier defines a non-zero rate for this type.
    let (total, discount) = match membership {
        Some(tier) => {
            let rate = tier.discount_rate(billing_type);
            if rate.is_zero() {
                (raw_total, None)
            } else {
                (
                    raw_total.apply_discount(rate),
                    Some(AppliedDiscount { tier, rate }),
                )
            }
        }
        None => (raw_total, None),
    };

    // Commission step: exempt types and all-exempt item sets pay nothing.
    let exempt = match billing_type {
        BillingType::Upgrades | BillingType::Membership => true,
        BillingType::Items => exempt_items,
        BillingType::Repair | BillingType::Customization => false,
    };

    let commission = if exempt {
        Money::ZERO
    } else {
        total.apply_rate(rank.commission_rate())
    };
    let tax = commission.apply_rate(COMMISSION_TAX_RATE);

    BillTotals {
        raw_total,
        total,
        discount,
        commission,
        tax,
    }
}

/// Loyalty points accrued by a bill: `floor(total / earn_per_rs)`.
///
/// The caller decides whether accrual applies at all (never on MEMBERSHIP
/// bills, never without a customer).
#[inline]
pub fn loyalty_points(total: Money, config: &BillingConfig) -> i64 {
    total.units_of(config.loyalty_earn_per_rs)
}

// =============================================================================
// Detail Strings
// =============================================================================

/// Renders the human-readable details line for a bill.
///
/// Output only. Nothing in the engine parses these strings back.
pub fn render_details(kind: &SaleKind, priced: &[PricedLine]) -> String {
    match kind {
        SaleKind::Items { .. } => priced
            .iter()
            .map(|line| format!("{} ×{}", line.name, line.quantity))
            .collect::<Vec<_>>()
            .join(", "),
        SaleKind::Upgrades { base } => format!("Upgrade (base {base})"),
        SaleKind::RepairStandard { base } => format!("Standard repair (base {base})"),
        SaleKind::RepairAdvanced { parts } => format!("Advanced repair ({parts} parts)"),
        SaleKind::Customization { base } => format!("Customization (base {base})"),
        SaleKind::Membership { tier } => format!("{tier} membership"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn priced(name: &str, price: i64, qty: i64) -> PricedLine {
        PricedLine {
            name: name.into(),
            unit_price: Money::from_rupees(price),
            quantity: qty,
        }
    }

    #[test]
    fn test_items_total() {
        let lines = [priced("NOS", 1500, 2), priced("Repair Kit", 800, 1)];
        assert_eq!(items_total(&lines), Money::from_rupees(3800));
        assert_eq!(items_total(&[]), Money::ZERO);
    }

    #[test]
    fn test_raw_totals_per_kind() {
        assert_eq!(
            upgrades_total(Money::from_rupees(1000)),
            Money::from_rupees(1500)
        );
        assert_eq!(
            repair_standard_total(Money::from_rupees(1000)),
            Money::from_rupees(1450)
        );
        assert_eq!(repair_advanced_total(4), Money::from_rupees(1000));
        assert_eq!(
            customization_total(Money::from_rupees(750)),
            Money::from_rupees(1500)
        );
    }

    #[test]
    fn test_manager_repair_no_membership() {
        // Spec worked example: Manager, ₹1000 base repair, no membership
        let raw = repair_standard_total(Money::from_rupees(1000));
        let totals = finalize(raw, BillingType::Repair, None, EmployeeRank::Manager, false);

        assert_eq!(totals.total, Money::from_rupees(1450));
        assert_eq!(totals.commission, Money::new(dec!(362.50)));
        assert_eq!(totals.tax, Money::new(dec!(18.125)));
        assert!(totals.discount.is_none());
    }

    #[test]
    fn test_manager_repair_tier2_member() {
        // Same sale to a Tier2 member
        let raw = repair_standard_total(Money::from_rupees(1000));
        let totals = finalize(
            raw,
            BillingType::Repair,
            Some(MembershipTier::Tier2),
            EmployeeRank::Manager,
            false,
        );

        assert_eq!(totals.total, Money::new(dec!(971.5)));
        assert_eq!(totals.commission, Money::new(dec!(242.875)));
        assert_eq!(totals.tax, Money::new(dec!(12.14375)));
        let discount = totals.discount.expect("discount applied");
        assert_eq!(discount.tier, MembershipTier::Tier2);
        assert_eq!(discount.rate, dec!(0.33));
    }

    #[test]
    fn test_upgrades_and_membership_never_pay_commission() {
        for billing_type in [BillingType::Upgrades, BillingType::Membership] {
            let totals = finalize(
                Money::from_rupees(9000),
                billing_type,
                Some(MembershipTier::Tier3),
                EmployeeRank::Ceo,
                false,
            );
            assert!(totals.commission.is_zero());
            assert!(totals.tax.is_zero());
            // Tier3 discounts repair/customization only
            assert_eq!(totals.total, Money::from_rupees(9000));
        }
    }

    #[test]
    fn test_exempt_item_set() {
        let all_exempt = [
            ItemSelection::new("NOS", 2),
            ItemSelection::new("Harness", 1),
        ];
        let mixed = [
            ItemSelection::new("NOS", 2),
            ItemSelection::new("Repair Kit", 1),
        ];
        assert!(all_commission_exempt(&all_exempt));
        assert!(!all_commission_exempt(&mixed));
        assert!(!all_commission_exempt(&[]));
    }

    #[test]
    fn test_exempt_items_zero_commission() {
        // 2×NOS at ₹1500: total 3000, no commission, no tax
        let raw = items_total(&[priced("NOS", 1500, 2)]);
        let totals = finalize(
            raw,
            BillingType::Items,
            None,
            EmployeeRank::SeniorMechanic,
            true,
        );
        assert_eq!(totals.total, Money::from_rupees(3000));
        assert!(totals.commission.is_zero());
        assert!(totals.tax.is_zero());
    }

    #[test]
    fn test_mixed_items_pay_commission() {
        let raw = items_total(&[priced("NOS", 1500, 1), priced("Repair Kit", 800, 1)]);
        let totals = finalize(
            raw,
            BillingType::Items,
            None,
            EmployeeRank::Mechanic,
            false,
        );
        assert_eq!(totals.commission, Money::new(dec!(345)));
        assert_eq!(totals.tax, Money::new(dec!(17.25)));
    }

    #[test]
    fn test_membership_discount_ignored_for_items() {
        let totals = finalize(
            Money::from_rupees(3000),
            BillingType::Items,
            Some(MembershipTier::Tier3),
            EmployeeRank::Trainee,
            false,
        );
        assert_eq!(totals.total, Money::from_rupees(3000));
        assert!(totals.discount.is_none());
    }

    #[test]
    fn test_loyalty_points_floor() {
        let config = BillingConfig::default();
        assert_eq!(loyalty_points(Money::from_rupees(3000), &config), 30);
        assert_eq!(loyalty_points(Money::new(dec!(971.5)), &config), 9);
        assert_eq!(loyalty_points(Money::from_rupees(99), &config), 0);
    }

    #[test]
    fn test_render_details() {
        let kind = SaleKind::Items {
            lines: vec![ItemSelection::new("NOS", 2)],
        };
        let lines = [priced("NOS", 1500, 2)];
        assert_eq!(render_details(&kind, &lines), "NOS ×2");

        let membership = SaleKind::Membership {
            tier: MembershipTier::Tier2,
        };
        assert_eq!(render_details(&membership, &[]), "Tier2 membership");

        let repair = SaleKind::RepairStandard {
            base: Money::from_rupees(1000),
        };
        assert_eq!(render_details(&repair, &[]), "Standard repair (base ₹1000.00)");
    }
}
