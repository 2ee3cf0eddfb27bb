//! # Billing Operation
//!
//! `save_bill`: compute a finalized, auditable monetary outcome for one sale
//! and persist it plus its side effects.
//!
//! ## One Sale = One Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     save_bill Transaction                               │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    1. sweep expired memberships      (happens-before any tier read)     │
//! │    2. load employee (rank)                                              │
//! │    3. ITEMS: load items, check EVERY line's stock (reject before        │
//! │       any write if short)                                               │
//! │    4. compute: raw total → discount → commission → tax   (pure core)    │
//! │    5. INSERT bill                                                       │
//! │    6. ITEMS: decrement each line's stock                                │
//! │    7. non-MEMBERSHIP + customer: accrue floor(total/100) points         │
//! │    8. MEMBERSHIP: upsert the customer's active membership               │
//! │  COMMIT   ← all writes land, or none do                                 │
//! │                                                                         │
//! │  No partial bill is ever observable: stock decremented without a bill   │
//! │  row (or vice versa) cannot happen.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use exoticbill_core::billing::{self, AppliedDiscount, PricedLine};
use exoticbill_core::types::Membership;
use exoticbill_core::validation;
use exoticbill_core::{Bill, BillingType, CoreError, Money, SaleKind};
use exoticbill_db::repository::bill::BillRepository;
use exoticbill_db::repository::employee::EmployeeRepository;
use exoticbill_db::repository::item::ItemRepository;
use exoticbill_db::repository::loyalty::LoyaltyRepository;
use exoticbill_db::repository::membership::MembershipRepository;

use crate::error::{EngineError, EngineResult};
use crate::BillingEngine;

// =============================================================================
// Request / Outcome
// =============================================================================

/// The raw parameters of one sale, as collected by the presentation layer.
#[derive(Debug, Clone)]
pub struct SaleRequest {
    pub employee_cid: String,
    /// Customer CID; required for MEMBERSHIP, optional elsewhere (loyalty
    /// only accrues when present).
    pub customer_cid: Option<String>,
    pub kind: SaleKind,
}

impl SaleRequest {
    pub fn new(employee_cid: impl Into<String>, kind: SaleKind) -> Self {
        SaleRequest {
            employee_cid: employee_cid.into(),
            customer_cid: None,
            kind,
        }
    }

    pub fn with_customer(mut self, customer_cid: impl Into<String>) -> Self {
        self.customer_cid = Some(customer_cid.into());
        self
    }
}

/// What the caller gets back for display: the persisted bill (absent only
/// for free Racer grants), the computed amounts, and side-effect summaries.
#[derive(Debug, Clone)]
pub struct SaleOutcome {
    pub bill: Option<Bill>,
    pub total: Money,
    pub commission: Money,
    pub tax: Money,
    pub discount: Option<AppliedDiscount>,
    pub loyalty_earned: i64,
}

// =============================================================================
// save_bill
// =============================================================================

impl BillingEngine {
    /// Saves one sale at the current instant. See [`Self::save_bill_at`].
    pub async fn save_bill(&self, request: SaleRequest) -> EngineResult<SaleOutcome> {
        self.save_bill_at(request, Utc::now()).await
    }

    /// Saves one sale with an explicit timestamp.
    ///
    /// The whole operation is one transaction; any error leaves the store
    /// exactly as it was.
    pub async fn save_bill_at(
        &self,
        request: SaleRequest,
        now: DateTime<Utc>,
    ) -> EngineResult<SaleOutcome> {
        // Input shape checks first: nothing below runs on malformed input.
        validation::validate_cid(&request.employee_cid)?;
        if let Some(customer) = &request.customer_cid {
            validation::validate_cid(customer)?;
        }

        let billing_type = request.kind.billing_type();

        // MEMBERSHIP needs someone to attach the membership to.
        let membership_purchase = match &request.kind {
            SaleKind::Membership { tier } => match request.customer_cid.as_deref() {
                Some(customer) => Some((customer.to_string(), *tier)),
                None => return Err(CoreError::MissingCustomer.into()),
            },
            _ => None,
        };

        debug!(
            employee = %request.employee_cid,
            billing_type = %billing_type,
            "save_bill"
        );

        let mut tx = self.db.pool().begin().await?;

        // Expiry sweep happens-before any membership read in this operation,
        // so a stale tier can never grant a discount past expiry.
        MembershipRepository::sweep_expired(&mut tx, now, self.config.membership_days).await?;

        let employee = EmployeeRepository::fetch(&mut tx, &request.employee_cid)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", request.employee_cid.as_str()))?;

        // Raw total per billing type. For ITEMS this also prices every line
        // and validates stock for the ENTIRE selection before any write.
        let (raw_total, priced_lines, exempt_items) = match &request.kind {
            SaleKind::Items { lines } => {
                validation::validate_line_count(lines.len())?;

                let mut priced = Vec::with_capacity(lines.len());
                for line in lines {
                    validation::validate_name("item", &line.name)?;
                    validation::validate_quantity(line.quantity)?;

                    let item = ItemRepository::fetch(&mut tx, &line.name)
                        .await?
                        .ok_or_else(|| EngineError::not_found("Item", line.name.as_str()))?;

                    if !item.can_sell(line.quantity) {
                        return Err(CoreError::InsufficientStock {
                            item: item.name,
                            available: item.stock,
                            requested: line.quantity,
                        }
                        .into());
                    }

                    priced.push(PricedLine {
                        name: item.name,
                        unit_price: item.price,
                        quantity: line.quantity,
                    });
                }

                let exempt = billing::all_commission_exempt(lines);
                (billing::items_total(&priced), priced, exempt)
            }
            SaleKind::Upgrades { base } => {
                validation::validate_base_amount(*base)?;
                (billing::upgrades_total(*base), Vec::new(), false)
            }
            SaleKind::RepairStandard { base } => {
                validation::validate_base_amount(*base)?;
                (billing::repair_standard_total(*base), Vec::new(), false)
            }
            SaleKind::RepairAdvanced { parts } => {
                validation::validate_parts_count(*parts)?;
                (billing::repair_advanced_total(*parts), Vec::new(), false)
            }
            SaleKind::Customization { base } => {
                validation::validate_base_amount(*base)?;
                (billing::customization_total(*base), Vec::new(), false)
            }
            SaleKind::Membership { tier } => (tier.price(), Vec::new(), false),
        };

        // Active tier for the discount step (post-sweep, same transaction).
        let member_tier = match &request.customer_cid {
            Some(customer) => MembershipRepository::fetch(&mut tx, customer)
                .await?
                .map(|m| m.tier),
            None => None,
        };

        let totals = billing::finalize(
            raw_total,
            billing_type,
            member_tier,
            employee.rank,
            exempt_items,
        );

        // Racer grants are free: membership row, no bill, no loyalty.
        let records_bill = !matches!(&request.kind, SaleKind::Membership { tier } if tier.is_free());

        let bill = if records_bill {
            let bill = Bill {
                id: Uuid::new_v4().to_string(),
                employee_cid: request.employee_cid.clone(),
                customer_cid: request.customer_cid.clone(),
                billing_type,
                details: billing::render_details(&request.kind, &priced_lines),
                total: totals.total,
                commission: totals.commission,
                tax: totals.tax,
                created_at: now,
            };
            BillRepository::insert(&mut tx, &bill).await?;
            Some(bill)
        } else {
            None
        };

        // Stock side effect: every line was already validated above.
        for line in &priced_lines {
            ItemRepository::decrement_stock(&mut tx, &line.name, line.quantity).await?;
        }

        // Loyalty side effect: non-membership spend with a known customer.
        let loyalty_earned = match (&request.customer_cid, billing_type) {
            (Some(_), BillingType::Membership) | (None, _) => 0,
            (Some(customer), _) => {
                let points = billing::loyalty_points(totals.total, &self.config);
                if points > 0 {
                    LoyaltyRepository::accrue(&mut tx, customer, points, now).await?;
                }
                points
            }
        };

        // Membership side effect: replace any prior active membership.
        if let Some((customer, tier)) = &membership_purchase {
            MembershipRepository::upsert(
                &mut tx,
                &Membership {
                    customer_cid: customer.clone(),
                    tier: *tier,
                    purchased_at: now,
                },
            )
            .await?;
        }

        tx.commit().await?;

        info!(
            bill_id = bill.as_ref().map(|b| b.id.as_str()).unwrap_or("-"),
            billing_type = %billing_type,
            total = %totals.total,
            commission = %totals.commission,
            loyalty_earned,
            "Bill saved"
        );

        Ok(SaleOutcome {
            bill,
            total: totals.total,
            commission: totals.commission,
            tax: totals.tax,
            discount: totals.discount,
            loyalty_earned,
        })
    }

    /// Gets a live bill by ID.
    pub async fn bill(&self, id: &str) -> EngineResult<Option<Bill>> {
        Ok(self.db.bills().get_by_id(id).await?)
    }
}
