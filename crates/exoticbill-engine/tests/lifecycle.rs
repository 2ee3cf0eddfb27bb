//! Lifecycle tests: membership expiry, shift tracking, soft deletes, audit
//! trail, hood leaderboard and the confirmed reset.

mod common;

use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use exoticbill_core::{EmployeeRank, ItemSelection, MembershipTier, Money, SaleKind};
use exoticbill_engine::{EngineError, NewEmployee, SaleRequest};

use common::{engine, hire};

#[tokio::test]
async fn membership_expires_exactly_seven_days_after_purchase() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    let purchased = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    engine
        .save_bill_at(
            SaleRequest::new(
                "MGR-1",
                SaleKind::Membership {
                    tier: MembershipTier::Tier2,
                },
            )
            .with_customer("CUST-1"),
            purchased,
        )
        .await
        .unwrap();

    // Visible at T+6 days
    let at_six_days = engine
        .membership_of("CUST-1", purchased + Duration::days(6))
        .await
        .unwrap();
    assert!(at_six_days.is_some());

    // Absent at T+7 days, moved to history with expired_at == T+7d
    let at_seven_days = engine
        .membership_of("CUST-1", purchased + Duration::days(7))
        .await
        .unwrap();
    assert!(at_seven_days.is_none());

    let history = engine.membership_history("CUST-1").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].tier, MembershipTier::Tier2);
    assert_eq!(history[0].purchased_at, purchased);
    assert_eq!(history[0].expired_at, purchased + Duration::days(7));
}

#[tokio::test]
async fn expired_membership_grants_no_discount() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    let purchased = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    engine
        .save_bill_at(
            SaleRequest::new(
                "MGR-1",
                SaleKind::Membership {
                    tier: MembershipTier::Tier3,
                },
            )
            .with_customer("CUST-1"),
            purchased,
        )
        .await
        .unwrap();

    // A repair 8 days later sees no active membership: full price
    let outcome = engine
        .save_bill_at(
            SaleRequest::new(
                "MGR-1",
                SaleKind::RepairStandard {
                    base: Money::from_rupees(1000),
                },
            )
            .with_customer("CUST-1"),
            purchased + Duration::days(8),
        )
        .await
        .unwrap();

    assert_eq!(outcome.total, Money::new(dec!(1450)));
    assert!(outcome.discount.is_none());
}

#[tokio::test]
async fn repurchase_replaces_active_membership() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    let first = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let second = first + Duration::days(2);

    for (tier, at) in [
        (MembershipTier::Tier1, first),
        (MembershipTier::Tier3, second),
    ] {
        engine
            .save_bill_at(
                SaleRequest::new("MGR-1", SaleKind::Membership { tier }).with_customer("CUST-1"),
                at,
            )
            .await
            .unwrap();
    }

    // One active row, upgraded tier, clock restarted at the second purchase
    let membership = engine
        .membership_of("CUST-1", second)
        .await
        .unwrap()
        .expect("active membership");
    assert_eq!(membership.tier, MembershipTier::Tier3);
    assert_eq!(membership.purchased_at, second);
    assert_eq!(engine.db().memberships().count_active().await.unwrap(), 1);
}

#[tokio::test]
async fn shift_summary_covers_exactly_the_open_interval() {
    let engine = engine().await;
    hire(&engine, "MECH-1", EmployeeRank::Mechanic).await;
    hire(&engine, "MECH-2", EmployeeRank::Mechanic).await;

    let start = Utc.with_ymd_and_hms(2026, 4, 10, 9, 0, 0).unwrap();

    let shift = engine
        .start_shift_at("MECH-1", "test-admin", start)
        .await
        .unwrap();
    assert!(shift.is_open());

    // A second start for the same employee conflicts
    let err = engine
        .start_shift_at("MECH-1", "test-admin", start + Duration::minutes(1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Two bills inside the interval for MECH-1, one for someone else
    for minutes in [10, 25] {
        engine
            .save_bill_at(
                SaleRequest::new(
                    "MECH-1",
                    SaleKind::RepairStandard {
                        base: Money::from_rupees(1000),
                    },
                ),
                start + Duration::minutes(minutes),
            )
            .await
            .unwrap();
    }
    engine
        .save_bill_at(
            SaleRequest::new(
                "MECH-2",
                SaleKind::RepairStandard {
                    base: Money::from_rupees(1000),
                },
            ),
            start + Duration::minutes(15),
        )
        .await
        .unwrap();

    let closed = engine
        .end_shift_at("MECH-1", "test-admin", start + Duration::minutes(60))
        .await
        .unwrap();

    assert_eq!(closed.duration_minutes, Some(60));
    assert_eq!(closed.bills_count, Some(2));
    assert_eq!(closed.revenue, Some(Money::from_rupees(2900)));
    assert!(engine.open_shift("MECH-1").await.unwrap().is_none());

    // Ending again fails: no open shift left
    let err = engine
        .end_shift_at("MECH-1", "test-admin", start + Duration::minutes(90))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));

    // Both transitions were audit-logged with snapshots
    let entries = engine
        .db()
        .audit()
        .for_row("shifts", &closed.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "SHIFT_STARTED");
    assert!(entries[0].old_values.is_none());
    assert!(entries[0].new_values.is_some());
    assert_eq!(entries[1].action, "SHIFT_ENDED");
    assert!(entries[1].old_values.is_some());
}

#[tokio::test]
async fn soft_delete_moves_bill_and_audits_prior_state() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    let outcome = engine
        .save_bill(SaleRequest::new(
            "MGR-1",
            SaleKind::Items {
                lines: vec![ItemSelection::new("NOS", 1)],
            },
        ))
        .await
        .unwrap();
    let bill = outcome.bill.unwrap();

    let deleted = engine
        .soft_delete_bill(&bill.id, "admin-7")
        .await
        .unwrap();
    assert_eq!(deleted.deleted_by, "admin-7");
    assert_eq!(deleted.total, bill.total);

    // Gone from the live set, present in the deleted set
    assert!(engine.bill(&bill.id).await.unwrap().is_none());
    let archived = engine
        .db()
        .bills()
        .get_deleted(&bill.id)
        .await
        .unwrap()
        .expect("archived bill");
    assert_eq!(archived.deleted_by, "admin-7");

    // Audit entry carries the full prior state and no new state
    let entries = engine.db().audit().for_row("bills", &bill.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "BILL_DELETED");
    assert_eq!(entries[0].actor, "admin-7");
    let old: serde_json::Value =
        serde_json::from_str(entries[0].old_values.as_ref().unwrap()).unwrap();
    assert_eq!(old["id"], bill.id.as_str());
    assert!(entries[0].new_values.is_none());

    // Deleting again is NotFound
    let err = engine.soft_delete_bill(&bill.id, "admin-7").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}

#[tokio::test]
async fn employee_edits_are_audited_with_before_and_after() {
    let engine = engine().await;
    hire(&engine, "T-1", EmployeeRank::Trainee).await;

    let mut employee = engine.employee("T-1").await.unwrap().unwrap();
    employee.rank = EmployeeRank::Mechanic;
    engine.update_employee(employee, "admin-1").await.unwrap();

    let entries = engine
        .db()
        .audit()
        .for_row("employees", "T-1")
        .await
        .unwrap();
    // Hire + edit
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].action, "EMPLOYEE_UPDATED");

    let old: serde_json::Value =
        serde_json::from_str(entries[1].old_values.as_ref().unwrap()).unwrap();
    let new: serde_json::Value =
        serde_json::from_str(entries[1].new_values.as_ref().unwrap()).unwrap();
    assert_eq!(old["rank"], "Trainee");
    assert_eq!(new["rank"], "Mechanic");

    // Future commissions use the new rank
    let outcome = engine
        .save_bill(SaleRequest::new(
            "T-1",
            SaleKind::RepairStandard {
                base: Money::from_rupees(1000),
            },
        ))
        .await
        .unwrap();
    assert_eq!(outcome.commission, Money::new(dec!(217.50)));
}

#[tokio::test]
async fn duplicate_cid_and_hood_conflict() {
    let engine = engine().await;
    hire(&engine, "EMP-1", EmployeeRank::Trainee).await;

    let err = engine
        .add_employee(
            NewEmployee {
                cid: "EMP-1".to_string(),
                name: "Duplicate".to_string(),
                rank: EmployeeRank::Trainee,
                hood: None,
            },
            "admin-1",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    engine.add_hood("Eastside").await.unwrap();
    let err = engine.add_hood("Eastside").await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn hood_leaderboard_orders_by_revenue() {
    let engine = engine().await;
    engine.add_hood("Eastside").await.unwrap();
    engine.add_hood("Docks").await.unwrap();

    for (cid, hood) in [("E-1", "Eastside"), ("D-1", "Docks")] {
        engine
            .add_employee(
                NewEmployee {
                    cid: cid.to_string(),
                    name: format!("Employee {cid}"),
                    rank: EmployeeRank::Mechanic,
                    hood: Some(hood.to_string()),
                },
                "admin-1",
            )
            .await
            .unwrap();
    }

    // Docks outsells Eastside
    engine
        .save_bill(SaleRequest::new(
            "E-1",
            SaleKind::RepairStandard {
                base: Money::from_rupees(1000),
            },
        ))
        .await
        .unwrap();
    for _ in 0..2 {
        engine
            .save_bill(SaleRequest::new(
                "D-1",
                SaleKind::RepairStandard {
                    base: Money::from_rupees(2000),
                },
            ))
            .await
            .unwrap();
    }

    let leaderboard = engine.hood_leaderboard(None).await.unwrap();
    assert_eq!(leaderboard.len(), 2);
    assert_eq!(leaderboard[0].hood, "Docks");
    assert_eq!(leaderboard[0].bills_count, 2);
    assert_eq!(leaderboard[0].revenue, Money::from_rupees(4900));
    assert_eq!(leaderboard[1].hood, "Eastside");
    assert_eq!(leaderboard[1].revenue, Money::from_rupees(1450));
}

#[tokio::test]
async fn billing_summary_breaks_down_by_type() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    engine
        .save_bill(SaleRequest::new(
            "MGR-1",
            SaleKind::RepairStandard {
                base: Money::from_rupees(1000),
            },
        ))
        .await
        .unwrap();
    engine
        .save_bill(SaleRequest::new(
            "MGR-1",
            SaleKind::Upgrades {
                base: Money::from_rupees(1000),
            },
        ))
        .await
        .unwrap();

    let summary = engine.billing_summary(Some("MGR-1"), None, None).await.unwrap();
    assert_eq!(summary.bills_count, 2);
    assert_eq!(summary.revenue, Money::new(dec!(2950)));
    assert_eq!(summary.commission, Money::new(dec!(362.50)));
    assert_eq!(summary.tax, Money::new(dec!(18.125)));
    assert_eq!(summary.by_type.len(), 2);

    let repairs = &summary.by_type[&exoticbill_core::BillingType::Repair];
    assert_eq!(repairs.bills_count, 1);
    assert_eq!(repairs.revenue, Money::new(dec!(1450)));
}

#[tokio::test]
async fn loyalty_adjustment_applies_arbitrary_deltas() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    engine.adjust_loyalty("CUST-1", 120).await.unwrap();
    engine.adjust_loyalty("CUST-1", -20).await.unwrap();
    assert_eq!(engine.loyalty_balance("CUST-1").await.unwrap(), 100);

    engine.adjust_loyalty("CUST-2", 40).await.unwrap();
    let top = engine.top_loyalty(10).await.unwrap();
    assert_eq!(top[0].customer_cid, "CUST-1");
    assert_eq!(top[0].points, 100);
}

#[tokio::test]
async fn reset_requires_explicit_confirmation() {
    let engine = engine().await;
    hire(&engine, "MGR-1", EmployeeRank::Manager).await;

    engine
        .save_bill(SaleRequest::new(
            "MGR-1",
            SaleKind::RepairStandard {
                base: Money::from_rupees(1000),
            },
        ))
        .await
        .unwrap();

    let err = engine
        .reset_billing_history(false, "admin-1")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(engine.bills(None, None, None).await.unwrap().len(), 1);

    let removed = engine.reset_billing_history(true, "admin-1").await.unwrap();
    assert_eq!(removed, 1);
    assert!(engine.bills(None, None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn starter_catalog_is_seeded_once() {
    let engine = engine().await;

    let items = engine.items().await.unwrap();
    assert_eq!(items.len(), 6);

    let nos = items.iter().find(|i| i.name == "NOS").unwrap();
    assert_eq!(nos.price, Money::from_rupees(1500));
    let harness = items.iter().find(|i| i.name == "Harness").unwrap();
    assert_eq!(harness.price, Money::from_rupees(1200));
}
