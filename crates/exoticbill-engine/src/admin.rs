//! # Admin Operations
//!
//! Employee, hood, item and loyalty administration, bill soft-deletes, and
//! the confirmed destructive reset. Employee mutations and bill deletions
//! are audit-logged with before/after snapshots.

use chrono::Utc;
use tracing::{info, warn};

use exoticbill_core::rates::UNASSIGNED_HOOD;
use exoticbill_core::validation;
use exoticbill_core::{DeletedBill, Employee, EmployeeRank, Item, Money};
use exoticbill_db::repository::bill::BillRepository;

use crate::audit::{
    ACTION_BILLS_RESET, ACTION_BILL_DELETED, ACTION_EMPLOYEE_CREATED, ACTION_EMPLOYEE_DELETED,
    ACTION_EMPLOYEE_UPDATED, NO_SNAPSHOT,
};
use crate::error::{EngineError, EngineResult};
use crate::BillingEngine;

/// Parameters for hiring an employee. Credentials are issued externally and
/// start out absent.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub cid: String,
    pub name: String,
    pub rank: EmployeeRank,
    /// Team assignment; defaults to the unassigned pool.
    pub hood: Option<String>,
}

impl BillingEngine {
    // =========================================================================
    // Employees
    // =========================================================================

    /// Hires an employee.
    ///
    /// ## Errors
    /// * `Conflict` - CID already exists
    /// * `NotFound` - the named hood doesn't exist
    pub async fn add_employee(&self, new: NewEmployee, actor: &str) -> EngineResult<Employee> {
        validation::validate_cid(&new.cid)?;
        validation::validate_name("name", &new.name)?;

        let hood = match new.hood {
            Some(hood) => {
                self.db
                    .hoods()
                    .get(&hood)
                    .await?
                    .ok_or_else(|| EngineError::not_found("Hood", hood.as_str()))?;
                hood
            }
            None => UNASSIGNED_HOOD.to_string(),
        };

        let now = Utc::now();
        let employee = Employee {
            cid: new.cid,
            name: new.name,
            rank: new.rank,
            hood,
            username: None,
            password_hash: None,
            created_at: now,
            updated_at: now,
        };

        self.db.employees().insert(&employee).await?;

        self.record_audit(
            ACTION_EMPLOYEE_CREATED,
            "employees",
            &employee.cid,
            actor,
            NO_SNAPSHOT,
            Some(&employee),
        )
        .await;

        info!(cid = %employee.cid, rank = %employee.rank, "Employee added");

        Ok(employee)
    }

    /// Edits an employee (name, rank, hood, credentials).
    ///
    /// The audit entry carries the full prior row as `old_values` and the
    /// updated row as `new_values`.
    pub async fn update_employee(&self, employee: Employee, actor: &str) -> EngineResult<()> {
        validation::validate_cid(&employee.cid)?;
        validation::validate_name("name", &employee.name)?;

        let before = self
            .db
            .employees()
            .get(&employee.cid)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", employee.cid.as_str()))?;

        self.db.employees().update(&employee).await?;

        self.record_audit(
            ACTION_EMPLOYEE_UPDATED,
            "employees",
            &employee.cid,
            actor,
            Some(&before),
            Some(&employee),
        )
        .await;

        info!(cid = %employee.cid, "Employee updated");

        Ok(())
    }

    /// Removes an employee.
    pub async fn remove_employee(&self, cid: &str, actor: &str) -> EngineResult<()> {
        let before = self
            .db
            .employees()
            .get(cid)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", cid))?;

        self.db.employees().delete(cid).await?;

        self.record_audit(
            ACTION_EMPLOYEE_DELETED,
            "employees",
            cid,
            actor,
            Some(&before),
            NO_SNAPSHOT,
        )
        .await;

        info!(cid = %cid, "Employee removed");

        Ok(())
    }

    /// Gets an employee by CID.
    pub async fn employee(&self, cid: &str) -> EngineResult<Option<Employee>> {
        Ok(self.db.employees().get(cid).await?)
    }

    /// Lists all employees.
    pub async fn employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.db.employees().list().await?)
    }

    // =========================================================================
    // Hoods
    // =========================================================================

    /// Creates a hood.
    ///
    /// ## Errors
    /// * `Conflict` - hood name already exists
    pub async fn add_hood(&self, name: &str) -> EngineResult<()> {
        validation::validate_name("hood", name)?;
        self.db.hoods().insert(name).await?;
        info!(hood = %name, "Hood added");
        Ok(())
    }

    /// Removes a hood, moving its employees back to the unassigned pool.
    pub async fn remove_hood(&self, name: &str) -> EngineResult<()> {
        let reassigned = self.db.employees().clear_hood(name).await?;
        self.db.hoods().delete(name).await?;
        info!(hood = %name, reassigned, "Hood removed");
        Ok(())
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Adds a catalog item.
    ///
    /// ## Errors
    /// * `Conflict` - item name already exists
    pub async fn add_item(&self, name: &str, price: Money, stock: i64) -> EngineResult<Item> {
        validation::validate_name("item", name)?;
        if !price.is_positive() {
            return Err(EngineError::validation("item price must be positive"));
        }
        if stock < 0 {
            return Err(EngineError::validation("item stock cannot be negative"));
        }

        let now = Utc::now();
        let item = Item {
            name: name.to_string(),
            price,
            stock,
            created_at: now,
            updated_at: now,
        };

        self.db.items().insert(&item).await?;

        info!(item = %item.name, price = %item.price, stock, "Item added");

        Ok(item)
    }

    /// Restocks an item by a positive quantity.
    pub async fn restock_item(&self, name: &str, quantity: i64) -> EngineResult<()> {
        if quantity <= 0 {
            return Err(EngineError::validation("restock quantity must be positive"));
        }
        self.db.items().restock(name, quantity).await?;
        info!(item = %name, quantity, "Item restocked");
        Ok(())
    }

    /// Reprices an item.
    pub async fn set_item_price(&self, name: &str, price: Money) -> EngineResult<()> {
        if !price.is_positive() {
            return Err(EngineError::validation("item price must be positive"));
        }
        self.db.items().set_price(name, price).await?;
        Ok(())
    }

    /// Lists the catalog.
    pub async fn items(&self) -> EngineResult<Vec<Item>> {
        Ok(self.db.items().list().await?)
    }

    // =========================================================================
    // Loyalty
    // =========================================================================

    /// Applies an admin delta (may be negative) to a customer's points.
    pub async fn adjust_loyalty(&self, customer_cid: &str, delta: i64) -> EngineResult<()> {
        validation::validate_cid(customer_cid)?;
        self.db.loyalty().adjust(customer_cid, delta).await?;
        info!(customer = %customer_cid, delta, "Loyalty adjusted");
        Ok(())
    }

    // =========================================================================
    // Bill Soft Delete / Reset
    // =========================================================================

    /// Soft-deletes a bill: moves it to the deleted-bills table with deleter
    /// identity and deletion time, in one transaction, then audit-logs the
    /// full prior state.
    ///
    /// ## Errors
    /// * `NotFound` - bill doesn't exist (or was already deleted)
    pub async fn soft_delete_bill(&self, bill_id: &str, actor: &str) -> EngineResult<DeletedBill> {
        let now = Utc::now();

        let mut tx = self.db.pool().begin().await?;

        let bill = BillRepository::fetch(&mut tx, bill_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Bill", bill_id))?;

        BillRepository::soft_delete(&mut tx, &bill, actor, now).await?;

        tx.commit().await?;

        self.record_audit(ACTION_BILL_DELETED, "bills", bill_id, actor, Some(&bill), NO_SNAPSHOT)
            .await;

        info!(bill_id = %bill_id, actor = %actor, "Bill soft-deleted");

        Ok(DeletedBill {
            id: bill.id,
            employee_cid: bill.employee_cid,
            customer_cid: bill.customer_cid,
            billing_type: bill.billing_type,
            details: bill.details,
            total: bill.total,
            commission: bill.commission,
            tax: bill.tax,
            created_at: bill.created_at,
            deleted_by: actor.to_string(),
            deleted_at: now,
        })
    }

    /// Wipes the entire billing history, live and soft-deleted.
    ///
    /// Deliberately destructive and irreversible; refuses to run unless the
    /// caller passes `confirm = true`.
    pub async fn reset_billing_history(&self, confirm: bool, actor: &str) -> EngineResult<u64> {
        if !confirm {
            return Err(EngineError::validation(
                "billing history reset requires explicit confirmation",
            ));
        }

        let mut tx = self.db.pool().begin().await?;
        let removed = BillRepository::reset_all(&mut tx).await?;
        tx.commit().await?;

        self.record_audit(
            ACTION_BILLS_RESET,
            "bills",
            "*",
            actor,
            NO_SNAPSHOT,
            Some(&serde_json::json!({ "rows_removed": removed })),
        )
        .await;

        warn!(actor = %actor, removed, "Billing history reset");

        Ok(removed)
    }
}
