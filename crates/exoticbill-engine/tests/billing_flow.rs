//! End-to-end billing flow tests: every billing type through the real
//! transaction path against an in-memory store.

mod common;

use rust_decimal_macros::dec;

use exoticbill_core::{
    BillingType, EmployeeRank, ItemSelection, MembershipTier, Money, SaleKind,
};
use exoticbill_engine::{EngineError, SaleRequest};

use common::{engine, hire};

#[tokio::test]
async fn repair_standard_without_membership_matches_worked_example() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    // Manager (0.25), base ₹1000 repair, no membership:
    // total = 1000 + 450 = 1450; commission = 362.50; tax = 18.125
    let outcome = engine
        .save_bill(SaleRequest::new(
            "MGR-1",
            SaleKind::RepairStandard {
                base: Money::from_rupees(1000),
            },
        ))
        .await
        .unwrap();

    assert_eq!(outcome.total, Money::new(dec!(1450)));
    assert_eq!(outcome.commission, Money::new(dec!(362.50)));
    assert_eq!(outcome.tax, Money::new(dec!(18.125)));
    assert!(outcome.discount.is_none());

    // The persisted bill carries the same amounts
    let bill = outcome.bill.expect("bill recorded");
    let stored = engine.bill(&bill.id).await.unwrap().expect("bill stored");
    assert_eq!(stored.billing_type, BillingType::Repair);
    assert_eq!(stored.total, Money::new(dec!(1450)));
    assert_eq!(stored.commission, Money::new(dec!(362.50)));
    assert_eq!(stored.tax, Money::new(dec!(18.125)));
}

#[tokio::test]
async fn repair_standard_with_tier2_membership_applies_discount() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    engine
        .save_bill(
            SaleRequest::new(
                "MGR-1",
                SaleKind::Membership {
                    tier: MembershipTier::Tier2,
                },
            )
            .with_customer("CUST-7"),
        )
        .await
        .unwrap();

    // Same repair to a Tier2 member: total = 1450 × 0.67 = 971.5
    let outcome = engine
        .save_bill(
            SaleRequest::new(
                "MGR-1",
                SaleKind::RepairStandard {
                    base: Money::from_rupees(1000),
                },
            )
            .with_customer("CUST-7"),
        )
        .await
        .unwrap();

    assert_eq!(outcome.total, Money::new(dec!(971.5)));
    assert_eq!(outcome.commission, Money::new(dec!(242.875)));
    assert_eq!(outcome.tax, Money::new(dec!(12.14375)));

    let discount = outcome.discount.expect("discount applied");
    assert_eq!(discount.tier, MembershipTier::Tier2);
    assert_eq!(discount.rate, dec!(0.33));
}

#[tokio::test]
async fn exempt_items_sale_pays_no_commission_but_accrues_loyalty() {
    let engine = engine().await;
    hire(&engine, "SM-1", EmployeeRank::SeniorMechanic).await;

    // 2×NOS at ₹1500: total 3000, commission 0, tax 0, +30 points
    let outcome = engine
        .save_bill(
            SaleRequest::new(
                "SM-1",
                SaleKind::Items {
                    lines: vec![ItemSelection::new("NOS", 2)],
                },
            )
            .with_customer("CUST-9"),
        )
        .await
        .unwrap();

    assert_eq!(outcome.total, Money::from_rupees(3000));
    assert!(outcome.commission.is_zero());
    assert!(outcome.tax.is_zero());
    assert_eq!(outcome.loyalty_earned, 30);
    assert_eq!(engine.loyalty_balance("CUST-9").await.unwrap(), 30);

    // Stock decremented by the sold quantity (seeded at 50)
    let items = engine.items().await.unwrap();
    let nos = items.iter().find(|i| i.name == "NOS").unwrap();
    assert_eq!(nos.stock, 48);

    let bill = outcome.bill.unwrap();
    assert_eq!(bill.details, "NOS ×2");
}

#[tokio::test]
async fn mixed_items_sale_pays_commission_on_full_total() {
    let engine = engine().await;
    hire(&engine, "MECH-1", EmployeeRank::Mechanic).await;

    // NOS (exempt) + Repair Kit (not exempt) → the whole set pays commission
    let outcome = engine
        .save_bill(SaleRequest::new(
            "MECH-1",
            SaleKind::Items {
                lines: vec![
                    ItemSelection::new("NOS", 1),
                    ItemSelection::new("Repair Kit", 1),
                ],
            },
        ))
        .await
        .unwrap();

    assert_eq!(outcome.total, Money::from_rupees(2300));
    assert_eq!(outcome.commission, Money::new(dec!(345)));
    assert_eq!(outcome.tax, Money::new(dec!(17.25)));
    // No customer on the request → no loyalty accrual
    assert_eq!(outcome.loyalty_earned, 0);
}

#[tokio::test]
async fn insufficient_stock_rejects_the_whole_sale() {
    let engine = engine().await;
    hire(&engine, "MECH-1", EmployeeRank::Mechanic).await;

    let err = engine
        .save_bill(SaleRequest::new(
            "MECH-1",
            SaleKind::Items {
                lines: vec![
                    ItemSelection::new("NOS", 2),
                    ItemSelection::new("Repair Kit", 999),
                ],
            },
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // Nothing was written: both stocks intact, no bill recorded
    let items = engine.items().await.unwrap();
    assert_eq!(items.iter().find(|i| i.name == "NOS").unwrap().stock, 50);
    assert_eq!(
        items.iter().find(|i| i.name == "Repair Kit").unwrap().stock,
        50
    );
    assert!(engine.bills(None, None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn upgrades_multiply_base_and_pay_no_commission() {
    let engine = engine().await;
    hire(&engine, "LUS-1", EmployeeRank::LeadUpgradeSpecialist).await;

    let outcome = engine
        .save_bill(SaleRequest::new(
            "LUS-1",
            SaleKind::Upgrades {
                base: Money::from_rupees(1000),
            },
        ))
        .await
        .unwrap();

    assert_eq!(outcome.total, Money::from_rupees(1500));
    assert!(outcome.commission.is_zero());
    assert!(outcome.tax.is_zero());
}

#[tokio::test]
async fn advanced_repair_bills_per_part() {
    let engine = engine().await;
    hire(&engine, "T-1", EmployeeRank::Trainee).await;

    let outcome = engine
        .save_bill(SaleRequest::new(
            "T-1",
            SaleKind::RepairAdvanced { parts: 4 },
        ))
        .await
        .unwrap();

    // 4 × ₹250 = ₹1000; Trainee commission 10%
    assert_eq!(outcome.total, Money::from_rupees(1000));
    assert_eq!(outcome.commission, Money::from_rupees(100));
    assert_eq!(outcome.tax, Money::new(dec!(5)));
}

#[tokio::test]
async fn customization_doubles_base_and_tier3_discounts_it() {
    let engine = engine().await;
    hire(&engine, "CEO-1", EmployeeRank::Ceo).await;

    engine
        .save_bill(
            SaleRequest::new(
                "CEO-1",
                SaleKind::Membership {
                    tier: MembershipTier::Tier3,
                },
            )
            .with_customer("CUST-3"),
        )
        .await
        .unwrap();

    let outcome = engine
        .save_bill(
            SaleRequest::new(
                "CEO-1",
                SaleKind::Customization {
                    base: Money::from_rupees(750),
                },
            )
            .with_customer("CUST-3"),
        )
        .await
        .unwrap();

    // 750 × 2 = 1500, Tier3 customization discount 30% → 1050
    assert_eq!(outcome.total, Money::new(dec!(1050)));
    assert_eq!(outcome.commission, Money::new(dec!(724.5)));
    assert_eq!(outcome.tax, Money::new(dec!(36.225)));
}

#[tokio::test]
async fn membership_purchase_records_bill_and_activates_tier() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    let outcome = engine
        .save_bill(
            SaleRequest::new(
                "MGR-1",
                SaleKind::Membership {
                    tier: MembershipTier::Tier1,
                },
            )
            .with_customer("CUST-5"),
        )
        .await
        .unwrap();

    assert_eq!(outcome.total, Money::from_rupees(5000));
    assert!(outcome.commission.is_zero());
    assert!(outcome.tax.is_zero());
    // Membership spend never accrues loyalty
    assert_eq!(outcome.loyalty_earned, 0);
    assert_eq!(engine.loyalty_balance("CUST-5").await.unwrap(), 0);

    let bill = outcome.bill.expect("tiered purchase records a bill");
    assert_eq!(bill.billing_type, BillingType::Membership);
    assert_eq!(bill.details, "Tier1 membership");

    let membership = engine
        .membership_of("CUST-5", chrono::Utc::now())
        .await
        .unwrap()
        .expect("active membership");
    assert_eq!(membership.tier, MembershipTier::Tier1);
}

#[tokio::test]
async fn racer_membership_is_free_and_records_no_bill() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    let outcome = engine
        .save_bill(
            SaleRequest::new(
                "MGR-1",
                SaleKind::Membership {
                    tier: MembershipTier::Racer,
                },
            )
            .with_customer("CUST-R"),
        )
        .await
        .unwrap();

    assert!(outcome.bill.is_none());
    assert!(outcome.total.is_zero());
    assert!(engine.bills(None, None, None).await.unwrap().is_empty());

    // The grant itself is visible as an active (zero-discount) membership
    let membership = engine
        .membership_of("CUST-R", chrono::Utc::now())
        .await
        .unwrap()
        .expect("racer membership active");
    assert_eq!(membership.tier, MembershipTier::Racer);
}

#[tokio::test]
async fn membership_purchase_without_customer_is_rejected() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    let err = engine
        .save_bill(SaleRequest::new(
            "MGR-1",
            SaleKind::Membership {
                tier: MembershipTier::Tier1,
            },
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn unknown_employee_is_not_found() {
    let engine = engine().await;

    let err = engine
        .save_bill(SaleRequest::new(
            "GHOST-1",
            SaleKind::Upgrades {
                base: Money::from_rupees(100),
            },
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::NotFound { .. }));
}

#[tokio::test]
async fn zero_base_amount_is_rejected_before_any_write() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    let err = engine
        .save_bill(SaleRequest::new(
            "MGR-1",
            SaleKind::RepairStandard { base: Money::ZERO },
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
    assert!(engine.bills(None, None, None).await.unwrap().is_empty());
}
