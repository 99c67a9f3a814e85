//! Table statistics for periodic reporting.
//!
//! Purely observational: failures show up as "unavailable" and never
//! affect the loop.

use std::time::Duration;
use stream_store::{Store, Table, EVENTS, ORDERS};
use tracing::{info, warn};

/// Window for the "recent activity" counts.
pub const RECENT_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Row count of `table`, or zero when the query fails.
pub(crate) async fn count_or_zero(store: &dyn Store, table: &Table) -> u64 {
    match store.count(table).await {
        Ok(count) => count,
        Err(e) => {
            warn!("Failed to count rows in {}: {}", table.name, e);
            0
        }
    }
}

/// Snapshot of per-table counts and recent activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    /// `(table, rows)` in [`Table::ALL`] order; `None` when the count failed.
    pub counts: Vec<(&'static str, Option<u64>)>,
    pub recent_events: Option<u64>,
    pub recent_orders: Option<u64>,
}

impl TableStats {
    /// Query every table's count and the recent-activity window.
    pub async fn collect(store: &dyn Store) -> Self {
        let mut counts = Vec::with_capacity(Table::ALL.len());
        for table in &Table::ALL {
            counts.push((table.name, store.count(table).await.ok()));
        }

        Self {
            counts,
            recent_events: store.count_recent(&EVENTS, RECENT_WINDOW).await.ok(),
            recent_orders: store.count_recent(&ORDERS, RECENT_WINDOW).await.ok(),
        }
    }

    /// Log the snapshot as human-readable lines.
    pub fn log(&self) {
        info!("Current database stats:");
        for (table, count) in &self.counts {
            match count {
                Some(count) => info!("  {}: {} rows", table, count),
                None => info!("  {}: unavailable", table),
            }
        }
        if let (Some(events), Some(orders)) = (self.recent_events, self.recent_orders) {
            info!(
                "  Recent activity ({} min): {} events, {} orders",
                RECENT_WINDOW.as_secs() / 60,
                events,
                orders
            );
        }
    }
}

/// Collect and log statistics in one step.
pub async fn report(store: &dyn Store) -> TableStats {
    let stats = TableStats::collect(store).await;
    stats.log();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stream_store::MemoryStore;

    #[tokio::test]
    async fn test_collect_counts() {
        let store = MemoryStore::new().with_population(3, 2).await;
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        store
            .insert_rows(&EVENTS, &[json!({"event_id": 1, "event_timestamp": now})])
            .await
            .unwrap();

        let stats = TableStats::collect(&store).await;

        assert_eq!(
            stats.counts,
            vec![
                ("users", Some(3)),
                ("products", Some(2)),
                ("orders", Some(0)),
                ("events", Some(1)),
            ]
        );
        assert_eq!(stats.recent_events, Some(1));
        assert_eq!(stats.recent_orders, Some(0));
    }

    #[tokio::test]
    async fn test_failures_are_unavailable() {
        let store = MemoryStore::new();
        store.set_fail_queries(true);

        let stats = report(&store).await;

        assert!(stats.counts.iter().all(|(_, c)| c.is_none()));
        assert_eq!(stats.recent_events, None);
    }

    #[tokio::test]
    async fn test_count_or_zero() {
        let store = MemoryStore::new().with_population(4, 0).await;
        assert_eq!(count_or_zero(&store, &stream_store::USERS).await, 4);

        store.set_fail_queries(true);
        assert_eq!(count_or_zero(&store, &stream_store::USERS).await, 0);
    }
}
