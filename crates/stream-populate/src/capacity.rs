//! Row-count ceilings and eviction of the oldest rows.

use crate::stats::count_or_zero;
use stream_store::{Store, Table};
use tracing::{info, warn};

/// Ceiling and per-cycle batch width of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLimit {
    pub table: Table,
    /// Maximum rows the table may hold once the cycle's batch lands.
    pub ceiling: u64,
    /// Rows inserted per cycle.
    pub batch_size: u64,
}

impl TableLimit {
    pub fn new(table: Table, ceiling: u64, batch_size: u64) -> Self {
        Self {
            table,
            ceiling,
            batch_size,
        }
    }

    /// Rows to evict so that `count` plus one batch fits under the ceiling.
    ///
    /// `count + batch - ceiling`, floored at zero and capped at `count`.
    pub fn excess(&self, count: u64) -> u64 {
        count
            .saturating_add(self.batch_size)
            .saturating_sub(self.ceiling)
            .min(count)
    }
}

/// What the enforcer did for one table in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eviction {
    /// Room for the batch already; nothing deleted.
    WithinCeiling { count: u64 },
    /// The oldest `rows` were deleted.
    Evicted { count: u64, rows: u64 },
    /// The store cannot delete rows from this table; drift accepted.
    Unsupported { count: u64, excess: u64 },
    /// The delete was attempted and failed.
    Failed { count: u64, excess: u64 },
}

impl Eviction {
    /// Rows actually removed.
    pub fn evicted(&self) -> u64 {
        match self {
            Eviction::Evicted { rows, .. } => *rows,
            _ => 0,
        }
    }
}

/// Evict the oldest rows of `limit.table` in excess of its ceiling.
///
/// A failed count reads as zero rows, so nothing is deleted. A failed or
/// unsupported delete is a warning; the ceiling simply is not enforced
/// this cycle.
pub async fn enforce(store: &dyn Store, limit: &TableLimit) -> Eviction {
    let table = &limit.table;
    let count = count_or_zero(store, table).await;
    let excess = limit.excess(count);

    if excess == 0 {
        return Eviction::WithinCeiling { count };
    }

    if !store.supports_delete(table) {
        warn!(
            "{} holds {} rows (ceiling {}), but {} cannot delete rows; capacity not enforced",
            table.name,
            count,
            limit.ceiling,
            store.name()
        );
        return Eviction::Unsupported { count, excess };
    }

    match store.delete_oldest(table, excess).await {
        Ok(()) => {
            info!("Cleaned up {} old {}", excess, table.name);
            Eviction::Evicted {
                count,
                rows: excess,
            }
        }
        Err(e) => {
            warn!(
                "Failed to evict {} old {} (count {}, ceiling {}): {}",
                excess, table.name, count, limit.ceiling, e
            );
            Eviction::Failed { count, excess }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use stream_store::{MemoryStore, EVENTS};

    fn events(n: u64) -> Vec<Value> {
        (1..=n)
            .map(|id| {
                // Ids ascend with time so the oldest rows have the smallest ids.
                let ts = chrono::DateTime::from_timestamp(1_700_000_000 + id as i64, 0)
                    .unwrap()
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string();
                json!({"event_id": id, "event_timestamp": ts})
            })
            .collect()
    }

    #[test]
    fn test_excess() {
        let limit = TableLimit::new(EVENTS, 100, 10);

        assert_eq!(limit.excess(0), 0);
        assert_eq!(limit.excess(50), 0);
        assert_eq!(limit.excess(90), 0);
        assert_eq!(limit.excess(95), 5);
        assert_eq!(limit.excess(100), 10);
        assert_eq!(limit.excess(130), 40);
    }

    #[test]
    fn test_excess_never_exceeds_count() {
        let limit = TableLimit::new(EVENTS, 0, 10);
        assert_eq!(limit.excess(3), 3);
        assert_eq!(limit.excess(0), 0);
    }

    #[tokio::test]
    async fn test_within_ceiling_deletes_nothing() {
        let store = MemoryStore::new();
        store.insert_rows(&EVENTS, &events(20)).await.unwrap();

        let outcome = enforce(&store, &TableLimit::new(EVENTS, 100, 10)).await;

        assert_eq!(outcome, Eviction::WithinCeiling { count: 20 });
        assert_eq!(store.delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_over_ceiling_evicts_oldest() {
        let store = MemoryStore::new();
        store.insert_rows(&EVENTS, &events(120)).await.unwrap();

        let outcome = enforce(&store, &TableLimit::new(EVENTS, 100, 10)).await;

        assert_eq!(outcome, Eviction::Evicted { count: 120, rows: 30 });
        assert_eq!(store.count(&EVENTS).await.unwrap(), 90);
        let ids = store.ids(&EVENTS).await;
        assert_eq!(ids.iter().min(), Some(&31));
    }

    #[tokio::test]
    async fn test_full_table_makes_room_for_batch() {
        let store = MemoryStore::new();
        store.insert_rows(&EVENTS, &events(100)).await.unwrap();

        let outcome = enforce(&store, &TableLimit::new(EVENTS, 100, 10)).await;

        assert_eq!(outcome.evicted(), 10);
        assert_eq!(store.count(&EVENTS).await.unwrap(), 90);
    }

    #[tokio::test]
    async fn test_delete_failure_is_absorbed() {
        let store = MemoryStore::new();
        store.insert_rows(&EVENTS, &events(120)).await.unwrap();
        store.set_fail_deletes(true);

        let outcome = enforce(&store, &TableLimit::new(EVENTS, 100, 10)).await;

        assert_eq!(outcome, Eviction::Failed { count: 120, excess: 30 });
        assert_eq!(store.count(&EVENTS).await.unwrap(), 120);
    }

    #[tokio::test]
    async fn test_unsupported_delete_is_noop() {
        let store = MemoryStore::new();
        store.insert_rows(&EVENTS, &events(120)).await.unwrap();
        store.set_no_delete(true);

        let outcome = enforce(&store, &TableLimit::new(EVENTS, 100, 10)).await;

        assert_eq!(outcome, Eviction::Unsupported { count: 120, excess: 30 });
        assert_eq!(store.delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_count_failure_skips_eviction() {
        let store = MemoryStore::new();
        store.insert_rows(&EVENTS, &events(120)).await.unwrap();
        store.set_fail_queries(true);

        let outcome = enforce(&store, &TableLimit::new(EVENTS, 100, 10)).await;

        assert_eq!(outcome, Eviction::WithinCeiling { count: 0 });
        assert_eq!(store.delete_calls(), 0);
    }
}
