//! # Audit Recorder
//!
//! Append-only, best-effort audit trail for mutating administrative actions.
//!
//! Audit writes run AFTER the primary operation commits. A failed append is
//! logged and swallowed: it must never fail or roll back the mutation it
//! describes.

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::BillingEngine;

// Action names recorded in audit_log.action
pub const ACTION_EMPLOYEE_CREATED: &str = "EMPLOYEE_CREATED";
pub const ACTION_EMPLOYEE_UPDATED: &str = "EMPLOYEE_UPDATED";
pub const ACTION_EMPLOYEE_DELETED: &str = "EMPLOYEE_DELETED";
pub const ACTION_BILL_DELETED: &str = "BILL_DELETED";
pub const ACTION_BILLS_RESET: &str = "BILLS_RESET";
pub const ACTION_SHIFT_STARTED: &str = "SHIFT_STARTED";
pub const ACTION_SHIFT_ENDED: &str = "SHIFT_ENDED";

impl BillingEngine {
    /// Appends one audit entry, fire-and-forget.
    ///
    /// `old` / `new` are the affected row before and after the mutation;
    /// either side may be absent (creation has no before, deletion has no
    /// after). Serialization or store failures are logged at WARN and
    /// otherwise ignored.
    pub(crate) async fn record_audit<O: Serialize, N: Serialize>(
        &self,
        action: &str,
        table_name: &str,
        row_id: &str,
        actor: &str,
        old: Option<&O>,
        new: Option<&N>,
    ) {
        let old_values = old.and_then(|value| serde_json::to_value(value).ok());
        let new_values = new.and_then(|value| serde_json::to_value(value).ok());

        let result = self
            .db
            .audit()
            .append(
                action,
                table_name,
                row_id,
                actor,
                old_values.as_ref(),
                new_values.as_ref(),
                Utc::now(),
            )
            .await;

        if let Err(err) = result {
            warn!(
                error = %err,
                action,
                table_name,
                row_id,
                "Audit append failed; primary operation unaffected"
            );
        }
    }
}

/// Serializable stand-in for "no snapshot on this side".
///
/// Rust needs a concrete type for an absent generic parameter;
/// `NO_SNAPSHOT` gives call sites a readable `None` of a known type.
pub(crate) const NO_SNAPSHOT: Option<&()> = None;
