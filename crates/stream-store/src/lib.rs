//! Store access for clickhouse-streamer.
//!
//! The streamer only needs a handful of operations from its target store:
//! row counts, the current maximum id, an ordered delete of the oldest rows,
//! and a bulk insert. They are captured by the [`Store`] trait so the cycle
//! logic can run against either a live ClickHouse server
//! ([`ClickHouseStore`]) or the in-process [`MemoryStore`] used for dry runs
//! and tests.

pub mod args;
pub mod clickhouse;
pub mod error;
pub mod memory;
pub mod store;
pub mod table;

pub use args::ClickHouseArgs;
pub use clickhouse::ClickHouseStore;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::Store;
pub use table::{Table, EVENTS, ORDERS, PRODUCTS, USERS};
