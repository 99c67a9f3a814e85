//! One-shot bulk load of users, products, orders and event history.

use crate::error::PopulateError;
use crate::insert::{insert_batch, BatchRecord};
use crate::stats;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use stream_generator::{Event, SeedGenerator};
use stream_store::{Store, Table};
use tokio::time::Instant;
use tracing::info;

/// What to seed and how fast.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub users: u64,
    pub products: u64,
    pub orders: u64,
    /// Average events per user; each user gets `10..=2 * events_per_user`.
    pub events_per_user: u64,
    pub seed: u64,
    /// Issue `CREATE TABLE IF NOT EXISTS` for every table first.
    pub create_tables: bool,
    /// Batch size for users and products.
    pub batch_size: usize,
    pub order_batch_size: usize,
    pub event_batch_size: usize,
    /// Pause after each batch to keep the server responsive.
    pub batch_pause: Duration,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 10_000,
            products: 1_000,
            orders: 25_000,
            events_per_user: 50,
            seed: 42,
            create_tables: false,
            batch_size: 1_000,
            order_batch_size: 500,
            event_batch_size: 5_000,
            batch_pause: Duration::from_millis(100),
        }
    }
}

/// Rows written per table, plus totals.
#[derive(Debug, Clone, Default)]
pub struct SeedMetrics {
    pub users: u64,
    pub products: u64,
    pub orders: u64,
    pub events: u64,
    /// Number of insert statements executed.
    pub batch_count: u64,
    pub total_duration: Duration,
}

impl SeedMetrics {
    pub fn rows_inserted(&self) -> u64 {
        self.users + self.products + self.orders + self.events
    }

    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_inserted() as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Bulk loader. Unlike the stream, any store error aborts the run.
pub struct Seeder {
    store: Arc<dyn Store>,
    generator: SeedGenerator,
    config: SeedConfig,
}

impl Seeder {
    pub fn new(store: Arc<dyn Store>, config: SeedConfig) -> Self {
        Self {
            store,
            generator: SeedGenerator::new(config.seed),
            config,
        }
    }

    /// Seed every table in dependency order.
    pub async fn run(&mut self) -> Result<SeedMetrics, PopulateError> {
        if self.config.orders > 0 && (self.config.users == 0 || self.config.products == 0) {
            return Err(PopulateError::Config(
                "orders need at least one user and one product".to_string(),
            ));
        }

        let started = Instant::now();
        let store = Arc::clone(&self.store);
        let store = store.as_ref();
        let mut metrics = SeedMetrics::default();
        let now = Utc::now();

        if self.config.create_tables {
            for table in &Table::ALL {
                info!("Creating table: {}", table.name);
                store.create_table(table).await?;
            }
        }

        info!("Starting data generation (seed {})...", self.config.seed);

        let users = self.generator.users(self.config.users, now);
        metrics.users = self
            .insert_in_batches(store, &users, self.config.batch_size, &mut metrics.batch_count)
            .await?;

        let products = self.generator.products(self.config.products, now);
        metrics.products = self
            .insert_in_batches(store, &products, self.config.batch_size, &mut metrics.batch_count)
            .await?;

        let orders =
            self.generator
                .orders(self.config.orders, self.config.users, self.config.products, now);
        metrics.orders = self
            .insert_in_batches(
                store,
                &orders,
                self.config.order_batch_size,
                &mut metrics.batch_count,
            )
            .await?;

        metrics.events = self.seed_events(store, &mut metrics.batch_count).await?;

        metrics.total_duration = started.elapsed();
        info!(
            "Seeded {} users, {} products, {} orders and {} events in {:?} ({:.0} rows/sec)",
            metrics.users,
            metrics.products,
            metrics.orders,
            metrics.events,
            metrics.total_duration,
            metrics.rows_per_second()
        );
        stats::report(store).await;

        Ok(metrics)
    }

    /// Events are generated user by user and flushed whenever the buffer
    /// reaches a full batch, so the whole history is never held at once.
    async fn seed_events(
        &mut self,
        store: &dyn Store,
        batch_count: &mut u64,
    ) -> Result<u64, PopulateError> {
        let batch_size = self.config.event_batch_size.max(1);
        let mut buffer: Vec<Event> = Vec::with_capacity(batch_size);
        let mut written = 0u64;
        let now = Utc::now();

        info!(
            "Generating events for {} users (~{} each)...",
            self.config.users, self.config.events_per_user
        );

        for user_id in 1..=self.config.users {
            let after_id = written + buffer.len() as u64;
            buffer.extend(self.generator.user_events(
                user_id,
                after_id,
                self.config.events_per_user,
                now,
            ));

            while buffer.len() >= batch_size {
                let batch: Vec<Event> = buffer.drain(..batch_size).collect();
                written += insert_batch(store, &batch).await? as u64;
                *batch_count += 1;
                info!("Inserted {} events so far", written);
                self.pause().await;
            }
        }

        if !buffer.is_empty() {
            written += insert_batch(store, &buffer).await? as u64;
            *batch_count += 1;
        }
        info!("Inserted {} events", written);

        Ok(written)
    }

    async fn insert_in_batches<R: BatchRecord>(
        &self,
        store: &dyn Store,
        rows: &[R],
        batch_size: usize,
        batch_count: &mut u64,
    ) -> Result<u64, PopulateError> {
        let table = R::TABLE.name;
        let chunks = rows.len().div_ceil(batch_size.max(1));
        let mut written = 0u64;

        for (i, chunk) in rows.chunks(batch_size.max(1)).enumerate() {
            written += insert_batch(store, chunk).await? as u64;
            *batch_count += 1;
            info!("Batch {}/{} completed for {}", i + 1, chunks, table);
            self.pause().await;
        }
        info!("Inserted {} {}", written, table);

        Ok(written)
    }

    async fn pause(&self) {
        if !self.config.batch_pause.is_zero() {
            tokio::time::sleep(self.config.batch_pause).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use stream_store::{MemoryStore, EVENTS, ORDERS, PRODUCTS, USERS};

    fn small() -> SeedConfig {
        SeedConfig {
            users: 20,
            products: 5,
            orders: 40,
            events_per_user: 10,
            seed: 42,
            create_tables: true,
            batch_size: 7,
            order_batch_size: 15,
            event_batch_size: 50,
            batch_pause: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_seed_populates_every_table() {
        let store = Arc::new(MemoryStore::new());
        let mut seeder = Seeder::new(store.clone(), small());

        let metrics = seeder.run().await.unwrap();

        assert_eq!(metrics.users, 20);
        assert_eq!(metrics.products, 5);
        assert_eq!(metrics.orders, 40);
        assert!((200..=400).contains(&metrics.events));
        assert_eq!(store.count(&USERS).await.unwrap(), 20);
        assert_eq!(store.count(&PRODUCTS).await.unwrap(), 5);
        assert_eq!(store.count(&ORDERS).await.unwrap(), 40);
        assert_eq!(store.count(&EVENTS).await.unwrap(), metrics.events);
        // users: 3 batches, products: 1, orders: 3
        assert!(metrics.batch_count >= 7 + metrics.events.div_ceil(50));
    }

    #[tokio::test]
    async fn test_seeded_event_ids_are_dense() {
        let store = Arc::new(MemoryStore::new());
        let metrics = Seeder::new(store.clone(), small()).run().await.unwrap();

        let ids = store.ids(&EVENTS).await;
        let expected: Vec<u64> = (1..=metrics.events).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_same_seed_same_dataset() {
        let a = Arc::new(MemoryStore::new());
        let b = Arc::new(MemoryStore::new());
        Seeder::new(a.clone(), small()).run().await.unwrap();
        Seeder::new(b.clone(), small()).run().await.unwrap();

        let users_a: HashSet<String> = a
            .rows(&USERS)
            .await
            .iter()
            .map(|row| row["username"].to_string())
            .collect();
        let users_b: HashSet<String> = b
            .rows(&USERS)
            .await
            .iter()
            .map(|row| row["username"].to_string())
            .collect();
        assert_eq!(users_a, users_b);
        assert_eq!(a.count(&EVENTS).await.unwrap(), b.count(&EVENTS).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_failure_aborts_seed() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_inserts(true);

        let result = Seeder::new(store.clone(), small()).run().await;

        assert!(matches!(result, Err(PopulateError::Store(_))));
        assert_eq!(store.insert_calls(), 1);
    }

    #[tokio::test]
    async fn test_orders_without_users_is_config_error() {
        let store = Arc::new(MemoryStore::new());
        let config = SeedConfig {
            users: 0,
            ..small()
        };

        let result = Seeder::new(store.clone(), config).run().await;

        assert!(matches!(result, Err(PopulateError::Config(_))));
        assert_eq!(store.insert_calls(), 0);
    }

    #[test]
    fn test_metrics_rate() {
        let metrics = SeedMetrics {
            users: 500,
            products: 500,
            total_duration: Duration::from_secs(2),
            ..SeedMetrics::default()
        };
        assert_eq!(metrics.rows_inserted(), 1_000);
        assert_eq!(metrics.rows_per_second(), 500.0);
    }
}
