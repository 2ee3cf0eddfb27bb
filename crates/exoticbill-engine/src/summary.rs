//! # Billing Summaries
//!
//! Read-side aggregation: per-employee/time-window billing summaries, the
//! hood leaderboard, and loyalty standings.
//!
//! Amounts are summed in Rust with exact decimals. SQL `SUM` over the TEXT
//! amount columns would coerce to floating point.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use exoticbill_core::rates::UNASSIGNED_HOOD;
use exoticbill_core::{Bill, BillingType, LoyaltyAccount, Money};

use crate::error::EngineResult;
use crate::BillingEngine;

/// Aggregate of one slice of bills.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeBreakdown {
    pub bills_count: i64,
    pub revenue: Money,
    pub commission: Money,
    pub tax: Money,
}

impl TypeBreakdown {
    fn add(&mut self, bill: &Bill) {
        self.bills_count += 1;
        self.revenue += bill.total;
        self.commission += bill.commission;
        self.tax += bill.tax;
    }
}

/// Billing summary over an optional employee and time-window filter.
#[derive(Debug, Clone, Default)]
pub struct BillingSummary {
    pub bills_count: i64,
    pub revenue: Money,
    pub commission: Money,
    pub tax: Money,
    /// Per-billing-type breakdown; types with no bills are absent.
    pub by_type: BTreeMap<BillingType, TypeBreakdown>,
}

/// One row of the hood leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct HoodStanding {
    pub hood: String,
    pub bills_count: i64,
    pub revenue: Money,
}

impl BillingEngine {
    /// Computes bill count, revenue, commission and tax totals over the
    /// selected bills, overall and per billing type.
    pub async fn billing_summary(
        &self,
        employee_cid: Option<&str>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> EngineResult<BillingSummary> {
        let bills = self
            .db
            .bills()
            .list_filtered(employee_cid, since, until)
            .await?;

        let mut summary = BillingSummary::default();
        for bill in &bills {
            summary.bills_count += 1;
            summary.revenue += bill.total;
            summary.commission += bill.commission;
            summary.tax += bill.tax;
            summary
                .by_type
                .entry(bill.billing_type)
                .or_default()
                .add(bill);
        }

        Ok(summary)
    }

    /// Revenue and bill count per hood, highest revenue first.
    ///
    /// Bills from employees who have since been removed count under the
    /// unassigned pool.
    pub async fn hood_leaderboard(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> EngineResult<Vec<HoodStanding>> {
        let employees = self.db.employees().list().await?;
        let hood_of: HashMap<&str, &str> = employees
            .iter()
            .map(|e| (e.cid.as_str(), e.hood.as_str()))
            .collect();

        let bills = self.db.bills().list_filtered(None, since, None).await?;

        let mut standings: BTreeMap<String, HoodStanding> = BTreeMap::new();
        for bill in &bills {
            let hood = hood_of
                .get(bill.employee_cid.as_str())
                .copied()
                .unwrap_or(UNASSIGNED_HOOD);
            let entry = standings
                .entry(hood.to_string())
                .or_insert_with(|| HoodStanding {
                    hood: hood.to_string(),
                    bills_count: 0,
                    revenue: Money::ZERO,
                });
            entry.bills_count += 1;
            entry.revenue += bill.total;
        }

        let mut leaderboard: Vec<HoodStanding> = standings.into_values().collect();
        leaderboard.sort_by(|a, b| b.revenue.cmp(&a.revenue));

        Ok(leaderboard)
    }

    /// Lists bills with optional employee and time-window filters, newest
    /// first.
    pub async fn bills(
        &self,
        employee_cid: Option<&str>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> EngineResult<Vec<Bill>> {
        Ok(self
            .db
            .bills()
            .list_filtered(employee_cid, since, until)
            .await?)
    }

    /// A customer's current loyalty balance (0 without an account).
    pub async fn loyalty_balance(&self, customer_cid: &str) -> EngineResult<i64> {
        Ok(self
            .db
            .loyalty()
            .get(customer_cid)
            .await?
            .map(|account| account.points)
            .unwrap_or(0))
    }

    /// Top loyalty accounts by point balance.
    pub async fn top_loyalty(&self, limit: i64) -> EngineResult<Vec<LoyaltyAccount>> {
        Ok(self.db.loyalty().top(limit).await?)
    }
}
