//! The store abstraction the stream loop writes through.

use crate::error::StoreError;
use crate::table::Table;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Operations the streamer needs from its target store.
///
/// Every call is a single, independent request. Nothing here is
/// transactional: an eviction and the insert that follows it commit
/// separately.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short name for log lines.
    fn name(&self) -> &'static str;

    /// Check the store answers queries.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Current row count of `table`.
    async fn count(&self, table: &Table) -> Result<u64, StoreError>;

    /// Rows of `table` whose time column falls within `window` of the store's "now".
    async fn count_recent(&self, table: &Table, window: Duration) -> Result<u64, StoreError>;

    /// Largest identifier in `table`, zero when it is empty.
    async fn max_id(&self, table: &Table) -> Result<u64, StoreError>;

    /// Whether [`Store::delete_oldest`] is available for `table`.
    fn supports_delete(&self, _table: &Table) -> bool {
        true
    }

    /// Delete the `rows` oldest rows of `table`, ordered by its time column.
    async fn delete_oldest(&self, table: &Table, rows: u64) -> Result<(), StoreError>;

    /// Insert all `rows` in one statement; either all apply or the call fails.
    async fn insert_rows(&self, table: &Table, rows: &[Value]) -> Result<(), StoreError>;

    /// Create `table` if it does not exist yet.
    async fn create_table(&self, table: &Table) -> Result<(), StoreError>;
}
