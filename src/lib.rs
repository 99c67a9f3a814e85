//! clickhouse-streamer
//!
//! Keeps a ClickHouse analytics database looking live: a `seed` command
//! loads users, products, orders and event history once, and a `stream`
//! command then appends small batches of events and orders on a fixed
//! period while evicting the oldest rows so each table stays under a
//! ceiling.
//!
//! The work is split across the workspace crates:
//!
//! - `stream_generator` - synthetic rows
//! - `stream_store` - the ClickHouse HTTP store and an in-memory store
//! - `stream_populate` - the stream loop, capacity enforcement and the seeder
//!
//! This crate only wires them to the command line.

pub mod seed;
pub mod stream;

pub use seed::run_seed;
pub use stream::run_stream;

use std::sync::Arc;
use stream_populate::connect::wait_for_store;
use stream_populate::RetryArgs;
use stream_store::{ClickHouseArgs, ClickHouseStore, Store};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Build the ClickHouse store and wait until it answers.
pub async fn connect_clickhouse(
    args: &ClickHouseArgs,
    retry: &RetryArgs,
) -> anyhow::Result<Arc<dyn Store>> {
    use anyhow::Context;

    tracing::info!("Connecting to ClickHouse at {}", args.display_url());
    let store = ClickHouseStore::new(args).context("Failed to build the ClickHouse client")?;
    wait_for_store(&store, retry.connect_retries, retry.connect_backoff)
        .await
        .context("ClickHouse is not reachable")?;
    Ok(Arc::new(store))
}
