//! Continuous, size-bounded populator for the analytics tables.
//!
//! One cycle of the stream runs, in order:
//!
//! ```text
//! capacity::enforce ──► sequence::current_max ──► StreamGenerator ──► insert::write_batch
//!   (evict oldest)        (ids from the store)     (events, orders)     (JSONEachRow)
//!                                                                            │
//!            sleep(period - elapsed) ◄── stats (every K cycles) ◄────────────┘
//! ```
//!
//! [`StreamPopulator`] owns the loop; [`Shutdown`] is the token that stops it
//! between cycles. [`Seeder`] is the one-shot bulk load of the same tables.

pub mod args;
pub mod capacity;
pub mod connect;
pub mod duration;
pub mod error;
pub mod insert;
pub mod populator;
pub mod seed;
pub mod sequence;
pub mod shutdown;
pub mod stats;

pub use args::{RetryArgs, SeedArgs, StreamArgs};
pub use capacity::{Eviction, TableLimit};
pub use error::PopulateError;
pub use insert::{BatchOutcome, BatchRecord};
pub use populator::{CycleReport, CycleState, StreamConfig, StreamMetrics, StreamPopulator};
pub use seed::{SeedConfig, SeedMetrics, Seeder};
pub use shutdown::{Shutdown, ShutdownTrigger};
