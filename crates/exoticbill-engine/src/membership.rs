//! # Membership Operations
//!
//! The expiry sweeper plus membership lookups. Every read of an active
//! membership runs the sweep first, in the same transaction, so a stale
//! membership is never visible past its expiry instant.

use chrono::{DateTime, Utc};
use tracing::info;

use exoticbill_core::{Membership, MembershipRecord};
use exoticbill_db::repository::membership::MembershipRepository;

use crate::error::EngineResult;
use crate::BillingEngine;

impl BillingEngine {
    /// Moves every membership whose purchase is `membership_days` or more in
    /// the past into the history archive.
    ///
    /// Pure move semantics: each expired membership becomes a history record
    /// with `expired_at = purchased_at + membership_days`; nothing is lost.
    ///
    /// ## Returns
    /// Number of memberships expired.
    pub async fn sweep_expired_memberships(&self, now: DateTime<Utc>) -> EngineResult<u64> {
        let mut tx = self.db.pool().begin().await?;

        let moved =
            MembershipRepository::sweep_expired(&mut tx, now, self.config.membership_days).await?;

        tx.commit().await?;

        if moved > 0 {
            info!(count = moved, "Membership expiry sweep complete");
        }

        Ok(moved)
    }

    /// The customer's active membership as of `now`, after sweeping.
    pub async fn membership_of(
        &self,
        customer_cid: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<Option<Membership>> {
        let mut tx = self.db.pool().begin().await?;

        MembershipRepository::sweep_expired(&mut tx, now, self.config.membership_days).await?;
        let membership = MembershipRepository::fetch(&mut tx, customer_cid).await?;

        tx.commit().await?;

        Ok(membership)
    }

    /// The customer's expired memberships, newest first.
    pub async fn membership_history(
        &self,
        customer_cid: &str,
    ) -> EngineResult<Vec<MembershipRecord>> {
        Ok(self.db.memberships().history_for(customer_cid).await?)
    }
}
