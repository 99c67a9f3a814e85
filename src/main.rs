//! Command-line interface for clickhouse-streamer
//!
//! # Usage Examples
//!
//! ## Seed the tables once
//! ```bash
//! clickhouse-streamer seed --create-tables \
//!   --users 10000 --products 1000 --orders 25000
//! ```
//!
//! ## Stream continuously
//! ```bash
//! # Every 30s: evict the oldest rows past the ceilings, then add
//! # 10 events and 3 orders.
//! CLICKHOUSE_HOST=localhost clickhouse-streamer stream
//!
//! # Faster, bounded run against an in-memory store
//! clickhouse-streamer stream --dry-run --interval 1s --max-cycles 5
//! ```
//!
//! Connection settings come from `CLICKHOUSE_HOST`, `CLICKHOUSE_PORT`,
//! `CLICKHOUSE_USER`, `CLICKHOUSE_PASSWORD` and `CLICKHOUSE_DB`; log
//! verbosity from `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use clickhouse_streamer::{run_seed, run_stream};
use stream_populate::{SeedArgs, StreamArgs};

#[derive(Parser)]
#[command(name = "clickhouse-streamer")]
#[command(about = "Continuously stream synthetic events and orders into ClickHouse")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the size-bounded stream until interrupted
    Stream {
        #[command(flatten)]
        args: StreamArgs,
    },

    /// Bulk-load users, products, orders and event history
    Seed {
        #[command(flatten)]
        args: SeedArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    clickhouse_streamer::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Stream { args } => run_stream(args).await,
        Commands::Seed { args } => run_seed(args).await,
    }
}
