//! # Shift Tracker
//!
//! One open labor interval per employee; a summary (duration, bill count,
//! revenue) is derived when the interval closes.
//!
//! Both transitions are audit-logged with before/after state.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use exoticbill_core::validation;
use exoticbill_core::{Money, Shift};

use crate::audit::{ACTION_SHIFT_ENDED, ACTION_SHIFT_STARTED, NO_SNAPSHOT};
use crate::error::{EngineError, EngineResult};
use crate::BillingEngine;

impl BillingEngine {
    /// Starts a shift at the current instant. See [`Self::start_shift_at`].
    pub async fn start_shift(&self, employee_cid: &str, actor: &str) -> EngineResult<Shift> {
        self.start_shift_at(employee_cid, actor, Utc::now()).await
    }

    /// Opens a shift for the employee.
    ///
    /// ## Errors
    /// * `NotFound` - employee doesn't exist
    /// * `Conflict` - the employee already has an open shift
    pub async fn start_shift_at(
        &self,
        employee_cid: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<Shift> {
        validation::validate_cid(employee_cid)?;

        self.db
            .employees()
            .get(employee_cid)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", employee_cid))?;

        if let Some(open) = self.db.shifts().open_for(employee_cid).await? {
            return Err(EngineError::conflict(format!(
                "employee {} already has an open shift (started {})",
                employee_cid, open.started_at
            )));
        }

        let shift = Shift {
            id: Uuid::new_v4().to_string(),
            employee_cid: employee_cid.to_string(),
            started_at: now,
            ended_at: None,
            duration_minutes: None,
            bills_count: None,
            revenue: None,
        };

        // The partial unique index catches a racing second start; the
        // pre-check above only exists for the friendlier message.
        self.db.shifts().insert_open(&shift).await?;

        self.record_audit(
            ACTION_SHIFT_STARTED,
            "shifts",
            &shift.id,
            actor,
            NO_SNAPSHOT,
            Some(&shift),
        )
        .await;

        info!(employee = %employee_cid, shift_id = %shift.id, "Shift started");

        Ok(shift)
    }

    /// Ends a shift at the current instant. See [`Self::end_shift_at`].
    pub async fn end_shift(&self, employee_cid: &str, actor: &str) -> EngineResult<Shift> {
        self.end_shift_at(employee_cid, actor, Utc::now()).await
    }

    /// Closes the employee's open shift, computing its summary:
    /// duration in minutes, plus the count and exact revenue of the
    /// employee's bills timestamped within `[started_at, now]`.
    ///
    /// ## Errors
    /// * `NotFound` - no open shift exists for the employee
    pub async fn end_shift_at(
        &self,
        employee_cid: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<Shift> {
        validation::validate_cid(employee_cid)?;

        let open = self
            .db
            .shifts()
            .open_for(employee_cid)
            .await?
            .ok_or_else(|| EngineError::not_found("Open shift", employee_cid))?;

        let duration_minutes = (now - open.started_at).num_minutes();

        let bills = self
            .db
            .bills()
            .list_filtered(Some(employee_cid), Some(open.started_at), Some(now))
            .await?;
        let bills_count = bills.len() as i64;
        let revenue: Money = bills.iter().map(|bill| bill.total).sum();

        self.db
            .shifts()
            .close(&open.id, now, duration_minutes, bills_count, revenue)
            .await?;

        let closed = Shift {
            ended_at: Some(now),
            duration_minutes: Some(duration_minutes),
            bills_count: Some(bills_count),
            revenue: Some(revenue),
            ..open.clone()
        };

        self.record_audit(
            ACTION_SHIFT_ENDED,
            "shifts",
            &open.id,
            actor,
            Some(&open),
            Some(&closed),
        )
        .await;

        info!(
            employee = %employee_cid,
            shift_id = %closed.id,
            duration_minutes,
            bills_count,
            revenue = %revenue,
            "Shift ended"
        );

        Ok(closed)
    }

    /// The employee's open shift, if any.
    pub async fn open_shift(&self, employee_cid: &str) -> EngineResult<Option<Shift>> {
        Ok(self.db.shifts().open_for(employee_cid).await?)
    }

    /// The employee's shift history, newest first.
    pub async fn shifts_of(&self, employee_cid: &str) -> EngineResult<Vec<Shift>> {
        Ok(self.db.shifts().list_for(employee_cid).await?)
    }
}
