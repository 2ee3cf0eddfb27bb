//! # Catalog Seeding
//!
//! Seeds the item catalog with the fixed starter set on first-ever boot.
//!
//! The seed runs if and only if the `items` table is empty, so a store that
//! was created by an older version (and already has a catalog) is never
//! touched, and re-running the bootstrap is a no-op.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use exoticbill_core::Money;

/// The starter catalog: (name, unit price in rupees, initial stock).
///
/// `NOS` and `Harness` are the no-commission pair; their presence here is
/// load-bearing for the commission exemption rule.
pub const STARTER_CATALOG: [(&str, i64, i64); 6] = [
    ("NOS", 1500, 50),
    ("Harness", 1200, 50),
    ("Repair Kit", 800, 50),
    ("Cleaning Kit", 300, 50),
    ("Tyre Smoke", 500, 50),
    ("Window Tint", 1000, 50),
];

/// Inserts the starter catalog if the item table is currently empty.
///
/// ## Returns
/// Number of items inserted (0 when the catalog already has entries).
pub async fn seed_default_items(pool: &SqlitePool) -> DbResult<u64> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        return Ok(0);
    }

    let now = Utc::now();
    let mut inserted = 0u64;

    for (name, price, stock) in STARTER_CATALOG {
        sqlx::query(
            r#"
            INSERT INTO items (name, price, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
        )
        .bind(name)
        .bind(Money::from_rupees(price))
        .bind(stock)
        .bind(now)
        .execute(pool)
        .await?;
        inserted += 1;
    }

    info!(count = inserted, "Seeded starter item catalog");
    Ok(inserted)
}
