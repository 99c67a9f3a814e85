//! The fixed-period stream loop.

use crate::capacity::{self, TableLimit};
use crate::insert::{write_batch, BatchOutcome};
use crate::sequence::current_max;
use crate::shutdown::Shutdown;
use crate::stats::{self, count_or_zero};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use stream_generator::StreamGenerator;
use stream_store::{Store, EVENTS, ORDERS, PRODUCTS, USERS};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Where the loop is within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Connected, no cycle run yet.
    Idle,
    Evicting,
    Generating,
    Writing,
    Reporting,
    Sleeping,
    /// A stop was observed at a cycle boundary; terminal.
    Stopped,
}

/// Loop configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Target period of one cycle, sleep included.
    pub interval: Duration,
    pub events: TableLimit,
    pub orders: TableLimit,
    /// Log table statistics every this many cycles.
    pub stats_every: u64,
    /// Stop after this many cycles; `None` runs until signalled.
    pub max_cycles: Option<u64>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            events: TableLimit::new(EVENTS, 10_000, 10),
            orders: TableLimit::new(ORDERS, 1_000, 3),
            stats_every: 3,
            max_cycles: None,
        }
    }
}

/// What one cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub events_evicted: u64,
    pub orders_evicted: u64,
    pub events_inserted: u64,
    pub orders_inserted: u64,
    pub failed_batches: u64,
    /// Maximum ids observed at cycle start.
    pub events_max_id: u64,
    pub orders_max_id: u64,
    pub elapsed: Duration,
}

/// Totals over a whole run.
#[derive(Debug, Clone, Default)]
pub struct StreamMetrics {
    pub cycles: u64,
    pub rows_inserted: u64,
    pub rows_evicted: u64,
    pub failed_batches: u64,
    pub total_duration: Duration,
}

impl StreamMetrics {
    fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;
        self.rows_inserted += report.events_inserted + report.orders_inserted;
        self.rows_evicted += report.events_evicted + report.orders_evicted;
        self.failed_batches += report.failed_batches;
    }
}

/// Continuous populator: evict, generate, write, report, sleep.
///
/// Runs on a single task; cycles never overlap. Store failures inside a
/// cycle are logged and absorbed, so only the shutdown token (or
/// `max_cycles`) ends the loop.
pub struct StreamPopulator {
    store: Arc<dyn Store>,
    generator: StreamGenerator,
    config: StreamConfig,
    state: CycleState,
}

impl StreamPopulator {
    /// Create a populator. `seed` makes the generated stream reproducible.
    pub fn new(store: Arc<dyn Store>, config: StreamConfig, seed: Option<u64>) -> Self {
        Self {
            store,
            generator: StreamGenerator::new(seed),
            config,
            state: CycleState::Idle,
        }
    }

    /// Current state of the loop.
    pub fn state(&self) -> CycleState {
        self.state
    }

    fn enter(&mut self, state: CycleState) {
        debug!("Stream state: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn reached_max_cycles(&self, cycles: u64) -> bool {
        self.config.max_cycles.is_some_and(|max| cycles >= max)
    }

    /// Run cycles until a stop is requested.
    ///
    /// The token is checked once per cycle, before eviction starts; a
    /// stop requested mid-cycle lets the cycle finish. Waiting out the rest
    /// of the period ends early on a stop.
    pub async fn run(&mut self, mut shutdown: Shutdown) -> StreamMetrics {
        let started = Instant::now();
        let mut metrics = StreamMetrics::default();

        info!(
            "Streaming {} events and {} orders every {:?}, keeping at most {} events and {} orders",
            self.config.events.batch_size,
            self.config.orders.batch_size,
            self.config.interval,
            self.config.events.ceiling,
            self.config.orders.ceiling
        );
        stats::report(self.store.as_ref()).await;

        loop {
            if shutdown.is_requested() || self.reached_max_cycles(metrics.cycles) {
                break;
            }

            let cycle_start = Instant::now();
            let report = self.run_cycle(metrics.cycles + 1).await;
            metrics.record(&report);

            self.enter(CycleState::Reporting);
            info!(
                "Cycle {} done in {:?}: +{} events, +{} orders, -{} events, -{} orders, {} failed batches",
                report.cycle,
                report.elapsed,
                report.events_inserted,
                report.orders_inserted,
                report.events_evicted,
                report.orders_evicted,
                report.failed_batches
            );
            if report.cycle % self.config.stats_every.max(1) == 0 {
                stats::report(self.store.as_ref()).await;
            }

            self.enter(CycleState::Sleeping);
            if self.reached_max_cycles(metrics.cycles) {
                continue;
            }
            let remaining = self.config.interval.saturating_sub(cycle_start.elapsed());
            if remaining.is_zero() {
                warn!(
                    "Cycle {} overran the {:?} period; starting the next one immediately",
                    report.cycle, self.config.interval
                );
                continue;
            }
            info!("Waiting {:.1}s until next batch", remaining.as_secs_f64());
            tokio::select! {
                _ = tokio::time::sleep(remaining) => {}
                _ = shutdown.requested() => {}
            }
        }

        self.enter(CycleState::Stopped);
        metrics.total_duration = started.elapsed();
        info!(
            "Streaming stopped after {} cycles: {} rows inserted, {} rows evicted, {} failed batches",
            metrics.cycles, metrics.rows_inserted, metrics.rows_evicted, metrics.failed_batches
        );
        info!("Final database state:");
        stats::report(self.store.as_ref()).await;

        metrics
    }

    /// Run one evict → generate → write cycle.
    pub async fn run_cycle(&mut self, cycle: u64) -> CycleReport {
        let started = Instant::now();
        let store = Arc::clone(&self.store);
        let store = store.as_ref();
        let mut report = CycleReport {
            cycle,
            ..CycleReport::default()
        };

        self.enter(CycleState::Evicting);
        report.events_evicted = capacity::enforce(store, &self.config.events).await.evicted();
        report.orders_evicted = capacity::enforce(store, &self.config.orders).await.evicted();

        self.enter(CycleState::Generating);
        info!("{} - Generating new data...", Utc::now().format("%Y-%m-%d %H:%M:%S"));
        let user_count = count_or_zero(store, &USERS).await;
        let product_count = count_or_zero(store, &PRODUCTS).await;
        if user_count == 0 {
            warn!("No users found, skipping event generation");
        }
        if user_count == 0 || product_count == 0 {
            warn!("No users or products found, skipping order generation");
        }
        report.events_max_id = current_max(store, &EVENTS).await;
        report.orders_max_id = current_max(store, &ORDERS).await;

        let now = Utc::now();
        let events = self.generator.events(
            report.events_max_id,
            user_count,
            self.config.events.batch_size as usize,
            now,
        );
        let orders = self.generator.orders(
            report.orders_max_id,
            user_count,
            product_count,
            self.config.orders.batch_size as usize,
            now,
        );

        self.enter(CycleState::Writing);
        let events_outcome = write_batch(store, &events).await;
        let orders_outcome = write_batch(store, &orders).await;
        report.events_inserted = tally(&events_outcome, &mut report.failed_batches);
        report.orders_inserted = tally(&orders_outcome, &mut report.failed_batches);

        report.elapsed = started.elapsed();
        report
    }
}

/// Rows written by a batch; failed batches are counted into `failed`.
fn tally(outcome: &BatchOutcome, failed: &mut u64) -> u64 {
    match outcome {
        BatchOutcome::Written(n) => *n as u64,
        BatchOutcome::Empty => 0,
        BatchOutcome::Failed { .. } => {
            *failed += 1;
            0
        }
    }
}
