//! `stream` command runner.

use anyhow::Context;
use std::sync::Arc;
use stream_populate::shutdown::{self, listen_for_signals};
use stream_populate::{StreamArgs, StreamPopulator};
use stream_store::{MemoryStore, Store};

use crate::connect_clickhouse;

/// Run the continuous stream until SIGINT/SIGTERM or `--max-cycles`.
pub async fn run_stream(args: StreamArgs) -> anyhow::Result<()> {
    let config = args.stream_config();

    let store: Arc<dyn Store> = if args.dry_run {
        tracing::info!(
            "[DRY-RUN] Streaming into an in-memory store with {} users and {} products",
            args.dry_run_users,
            args.dry_run_products
        );
        tracing::info!("[DRY-RUN] Would connect to {}", args.clickhouse.display_url());
        Arc::new(
            MemoryStore::new()
                .with_population(args.dry_run_users, args.dry_run_products)
                .await,
        )
    } else {
        connect_clickhouse(&args.clickhouse, &args.retry)
            .await
            .context("Failed to start the stream")?
    };

    let (trigger, token) = shutdown::channel();
    let signals = listen_for_signals(trigger);

    let mut populator = StreamPopulator::new(store, config, args.seed);
    let metrics = populator.run(token).await;
    signals.abort();

    tracing::info!(
        "Stream finished: {} cycles, {} rows inserted, {} rows evicted in {:?}",
        metrics.cycles,
        metrics.rows_inserted,
        metrics.rows_evicted,
        metrics.total_duration
    );
    Ok(())
}
