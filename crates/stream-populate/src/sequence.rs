//! Identifier assignment backed by the store.
//!
//! The store, not process memory, is the authority for the next id: each
//! cycle re-reads `max(id)` so a restarted process resumes numbering where
//! the table left off.

use stream_store::{Store, Table};
use tracing::warn;

/// Current maximum identifier in `table`.
///
/// Zero when the table is empty or the query fails. A failure is logged and
/// never propagated; the cycle carries on.
pub async fn current_max(store: &dyn Store, table: &Table) -> u64 {
    match store.max_id(table).await {
        Ok(id) => id,
        Err(e) => {
            warn!(
                "Failed to read max({}) from {}: {}; numbering from 1",
                table.id_column, table.name, e
            );
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stream_store::{MemoryStore, EVENTS, ORDERS};

    #[tokio::test]
    async fn test_empty_table_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(current_max(&store, &EVENTS).await, 0);
    }

    #[tokio::test]
    async fn test_reads_store_max() {
        let store = MemoryStore::new();
        store
            .insert_rows(&ORDERS, &[json!({"order_id": 17}), json!({"order_id": 4})])
            .await
            .unwrap();

        assert_eq!(current_max(&store, &ORDERS).await, 17);
    }

    #[tokio::test]
    async fn test_query_failure_degrades_to_zero() {
        let store = MemoryStore::new();
        store
            .insert_rows(&ORDERS, &[json!({"order_id": 17})])
            .await
            .unwrap();
        store.set_fail_queries(true);

        assert_eq!(current_max(&store, &ORDERS).await, 0);
    }
}
