//! Seed an in-memory store, then stream on top of it.

use clap::Parser;
use clickhouse_streamer::{run_seed, run_stream};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use stream_populate::shutdown;
use stream_populate::{
    SeedArgs, SeedConfig, Seeder, StreamArgs, StreamConfig, StreamPopulator, TableLimit,
};
use stream_store::{MemoryStore, Store, EVENTS, ORDERS, USERS};

fn seed_config() -> SeedConfig {
    SeedConfig {
        users: 30,
        products: 8,
        orders: 60,
        events_per_user: 10,
        seed: 42,
        create_tables: true,
        batch_size: 10,
        order_batch_size: 20,
        event_batch_size: 100,
        batch_pause: Duration::ZERO,
    }
}

#[tokio::test]
async fn stream_resumes_after_seeded_history_and_holds_ceiling() {
    let store = Arc::new(MemoryStore::new());
    let seeded = Seeder::new(store.clone(), seed_config()).run().await.unwrap();

    let ceiling = seeded.events;
    let config = StreamConfig {
        interval: Duration::from_millis(1),
        events: TableLimit::new(EVENTS, ceiling, 10),
        orders: TableLimit::new(ORDERS, 60, 3),
        stats_every: 2,
        max_cycles: Some(4),
    };
    let (_trigger, token) = shutdown::channel();

    let metrics = StreamPopulator::new(store.clone(), config, Some(9))
        .run(token)
        .await;

    assert_eq!(metrics.cycles, 4);
    assert_eq!(metrics.failed_batches, 0);
    assert_eq!(metrics.rows_inserted, 4 * (10 + 3));
    assert_eq!(store.count(&EVENTS).await.unwrap(), ceiling);
    assert_eq!(store.count(&ORDERS).await.unwrap(), 60);
    assert_eq!(store.count(&USERS).await.unwrap(), 30);

    // Streamed ids continue past the seeded history without collisions.
    let ids = store.ids(&EVENTS).await;
    let distinct: HashSet<u64> = ids.iter().copied().collect();
    assert_eq!(distinct.len(), ids.len());
    assert_eq!(ids.iter().max(), Some(&(seeded.events + 40)));
    assert_eq!(store.ids(&ORDERS).await.iter().max(), Some(&72));
}

#[tokio::test]
async fn stream_waits_for_users_before_writing() {
    let store = Arc::new(MemoryStore::new());
    let config = StreamConfig {
        interval: Duration::from_millis(1),
        max_cycles: Some(2),
        ..StreamConfig::default()
    };
    let (_trigger, token) = shutdown::channel();

    let metrics = StreamPopulator::new(store.clone(), config, None)
        .run(token)
        .await;

    assert_eq!(metrics.cycles, 2);
    assert_eq!(metrics.rows_inserted, 0);
    assert_eq!(store.insert_calls(), 0);
}

#[derive(Parser)]
struct StreamCli {
    #[command(flatten)]
    args: StreamArgs,
}

#[derive(Parser)]
struct SeedCli {
    #[command(flatten)]
    args: SeedArgs,
}

#[tokio::test]
async fn dry_run_stream_stops_after_max_cycles() {
    let cli = StreamCli::parse_from([
        "stream",
        "--dry-run",
        "--dry-run-users",
        "5",
        "--dry-run-products",
        "2",
        "--interval",
        "1ms",
        "--max-cycles",
        "2",
    ]);

    tokio::time::timeout(Duration::from_secs(10), run_stream(cli.args))
        .await
        .unwrap()
        .unwrap();
}

#[test]
fn dry_run_seed_completes() {
    let cli = SeedCli::parse_from([
        "seed",
        "--dry-run",
        "--users",
        "10",
        "--products",
        "3",
        "--orders",
        "20",
        "--events-per-user",
        "5",
        "--batch-pause",
        "0ms",
    ]);

    tokio_test::block_on(run_seed(cli.args)).unwrap();
}
