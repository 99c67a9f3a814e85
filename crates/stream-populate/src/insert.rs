//! Batched `JSONEachRow` inserts.

use crate::error::PopulateError;
use serde::Serialize;
use serde_json::Value;
use stream_generator::{Event, Order, Product, User};
use stream_store::{Store, Table, EVENTS, ORDERS, PRODUCTS, USERS};
use tracing::{error, info};

/// A row type bound to its target table.
pub trait BatchRecord: Serialize {
    const TABLE: Table;
}

impl BatchRecord for Event {
    const TABLE: Table = EVENTS;
}

impl BatchRecord for Order {
    const TABLE: Table = ORDERS;
}

impl BatchRecord for User {
    const TABLE: Table = USERS;
}

impl BatchRecord for Product {
    const TABLE: Table = PRODUCTS;
}

/// Result of submitting one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Nothing to write.
    Empty,
    /// Every row was written.
    Written(usize),
    /// The batch was rejected as a whole and dropped.
    Failed { rows: usize, error: String },
}

/// Insert a batch of rows in a single statement.
///
/// Returns the number of rows written. Either the whole batch applies or
/// the error is returned.
pub async fn insert_batch<R: BatchRecord>(
    store: &dyn Store,
    rows: &[R],
) -> Result<usize, PopulateError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let values = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()?;

    store.insert_rows(&R::TABLE, &values).await?;
    Ok(rows.len())
}

/// Write one stream batch, logging the outcome.
///
/// A failed batch is dropped: no retry and no requeue. The next cycle
/// generates an independent batch.
pub async fn write_batch<R: BatchRecord>(store: &dyn Store, rows: &[R]) -> BatchOutcome {
    let table = R::TABLE.name;
    match insert_batch(store, rows).await {
        Ok(0) => BatchOutcome::Empty,
        Ok(n) => {
            info!("Added {} new {}", n, table);
            BatchOutcome::Written(n)
        }
        Err(e) => {
            error!("Failed to add {} {}: {}", rows.len(), table, e);
            BatchOutcome::Failed {
                rows: rows.len(),
                error: e.to_string(),
            }
        }
    }
}
