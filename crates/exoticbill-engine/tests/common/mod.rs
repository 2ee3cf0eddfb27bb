//! Shared setup for engine integration tests: an isolated in-memory store
//! per test, bootstrapped through the real migration + seed path.

use exoticbill_core::EmployeeRank;
use exoticbill_db::{Database, DbConfig};
use exoticbill_engine::{BillingEngine, NewEmployee};

pub async fn engine() -> BillingEngine {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .try_init();

    let db = Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database");
    BillingEngine::new(db)
}

pub async fn hire(engine: &BillingEngine, cid: &str, rank: EmployeeRank) {
    engine
        .add_employee(
            NewEmployee {
                cid: cid.to_string(),
                name: format!("Employee {cid}"),
                rank,
                hood: None,
            },
            "test-admin",
        )
        .await
        .expect("hire employee");
}
