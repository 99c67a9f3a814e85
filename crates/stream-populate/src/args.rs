//! CLI/environment argument definitions for the `stream` and `seed` commands.

use crate::capacity::TableLimit;
use crate::duration::parse_duration;
use crate::populator::StreamConfig;
use crate::seed::SeedConfig;
use clap::Args;
use std::time::Duration;
use stream_store::{ClickHouseArgs, EVENTS, ORDERS};

/// Startup connectivity retry budget, shared by both commands.
#[derive(Args, Clone, Debug)]
pub struct RetryArgs {
    /// Connection attempts before giving up at startup
    #[arg(long, env = "CONNECT_RETRIES", default_value = "30")]
    pub connect_retries: u32,

    /// Delay between connection attempts
    #[arg(long, env = "CONNECT_BACKOFF", default_value = "2s", value_parser = parse_duration)]
    pub connect_backoff: Duration,
}

/// Arguments for the continuous stream.
#[derive(Args, Clone, Debug)]
pub struct StreamArgs {
    #[command(flatten)]
    pub clickhouse: ClickHouseArgs,

    #[command(flatten)]
    pub retry: RetryArgs,

    /// Cycle period (e.g. 30s, 1m)
    #[arg(long, env = "STREAM_INTERVAL", default_value = "30s", value_parser = parse_duration)]
    pub interval: Duration,

    /// Maximum number of events kept in the store
    #[arg(long, env = "MAX_EVENTS_TOTAL", default_value = "10000")]
    pub max_events: u64,

    /// Maximum number of orders kept in the store
    #[arg(long, env = "MAX_ORDERS_TOTAL", default_value = "1000")]
    pub max_orders: u64,

    /// Events generated per cycle
    #[arg(long, env = "BATCH_SIZE_EVENTS", default_value = "10")]
    pub event_batch_size: u64,

    /// Orders generated per cycle
    #[arg(long, env = "BATCH_SIZE_ORDERS", default_value = "3")]
    pub order_batch_size: u64,

    /// Log table statistics every N cycles
    #[arg(long, env = "STATS_EVERY", default_value = "3", value_parser = clap::value_parser!(u64).range(1..))]
    pub stats_every: u64,

    /// Random seed for a reproducible stream (random when unset)
    #[arg(long, env = "STREAM_SEED")]
    pub seed: Option<u64>,

    /// Stop after this many cycles (runs until interrupted when unset)
    #[arg(long)]
    pub max_cycles: Option<u64>,

    /// Dry-run mode: stream into an in-memory store instead of ClickHouse
    #[arg(long)]
    pub dry_run: bool,

    /// Users pre-populated in the in-memory store for a dry run
    #[arg(long, default_value = "10000")]
    pub dry_run_users: u64,

    /// Products pre-populated in the in-memory store for a dry run
    #[arg(long, default_value = "1000")]
    pub dry_run_products: u64,
}

impl StreamArgs {
    /// Loop configuration derived from the arguments.
    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            interval: self.interval,
            events: TableLimit::new(EVENTS, self.max_events, self.event_batch_size),
            orders: TableLimit::new(ORDERS, self.max_orders, self.order_batch_size),
            stats_every: self.stats_every,
            max_cycles: self.max_cycles,
        }
    }
}

/// Arguments for the one-shot bulk seed.
#[derive(Args, Clone, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub clickhouse: ClickHouseArgs,

    #[command(flatten)]
    pub retry: RetryArgs,

    /// Number of users to generate
    #[arg(long, default_value = "10000")]
    pub users: u64,

    /// Number of products to generate
    #[arg(long, default_value = "1000")]
    pub products: u64,

    /// Number of orders to generate
    #[arg(long, default_value = "25000")]
    pub orders: u64,

    /// Average events per user (each user gets 10..=2N)
    #[arg(long, default_value = "50")]
    pub events_per_user: u64,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Create the tables before inserting
    #[arg(long)]
    pub create_tables: bool,

    /// Batch size for users and products inserts
    #[arg(long, default_value = "1000")]
    pub batch_size: usize,

    /// Batch size for orders inserts
    #[arg(long, default_value = "500")]
    pub order_batch_size: usize,

    /// Batch size for events inserts
    #[arg(long, default_value = "5000")]
    pub event_batch_size: usize,

    /// Pause between batches
    #[arg(long, default_value = "100ms", value_parser = parse_duration)]
    pub batch_pause: Duration,

    /// Dry-run mode: seed an in-memory store instead of ClickHouse
    #[arg(long)]
    pub dry_run: bool,
}

impl SeedArgs {
    /// Seed configuration derived from the arguments.
    pub fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            users: self.users,
            products: self.products,
            orders: self.orders,
            events_per_user: self.events_per_user,
            seed: self.seed,
            create_tables: self.create_tables,
            batch_size: self.batch_size.max(1),
            order_batch_size: self.order_batch_size.max(1),
            event_batch_size: self.event_batch_size.max(1),
            batch_pause: self.batch_pause,
        }
    }
}
