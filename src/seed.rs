//! `seed` command runner.

use anyhow::Context;
use std::sync::Arc;
use stream_populate::{SeedArgs, Seeder};
use stream_store::{MemoryStore, Store};

use crate::connect_clickhouse;

/// Bulk-load every table once.
pub async fn run_seed(args: SeedArgs) -> anyhow::Result<()> {
    let config = args.seed_config();

    let store: Arc<dyn Store> = if args.dry_run {
        tracing::info!(
            "[DRY-RUN] Seeding an in-memory store (seed={}) instead of {}",
            config.seed,
            args.clickhouse.display_url()
        );
        Arc::new(MemoryStore::new())
    } else {
        connect_clickhouse(&args.clickhouse, &args.retry).await?
    };

    tracing::info!(
        "Seeding {} users, {} products, {} orders and ~{} events per user (seed={})",
        config.users,
        config.products,
        config.orders,
        config.events_per_user,
        config.seed
    );

    let metrics = Seeder::new(store, config)
        .run()
        .await
        .context("Seeding failed")?;

    tracing::info!(
        "Seed complete: {} rows in {} batches ({:.0} rows/sec)",
        metrics.rows_inserted(),
        metrics.batch_count,
        metrics.rows_per_second()
    );
    Ok(())
}
