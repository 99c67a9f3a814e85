//! In-process store for dry runs and tests.
//!
//! Rows are kept as JSON objects exactly as they would be sent to ClickHouse.
//! Failures can be injected per operation kind to exercise the stream loop's
//! error handling.

use crate::error::StoreError;
use crate::store::Store;
use crate::table::{Table, PRODUCTS, USERS};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// A [`Store`] that keeps every table in memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<&'static str, Vec<Value>>>,
    fail_queries: AtomicBool,
    fail_deletes: AtomicBool,
    fail_inserts: AtomicBool,
    no_delete: AtomicBool,
    insert_calls: AtomicU64,
    delete_calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `users` and `products` with minimal rows `1..=n`.
    pub async fn with_population(self, users: u64, products: u64) -> Self {
        {
            let mut tables = self.tables.lock().await;
            tables.insert(
                USERS.name,
                (1..=users).map(|id| json!({ "user_id": id })).collect(),
            );
            tables.insert(
                PRODUCTS.name,
                (1..=products).map(|id| json!({ "product_id": id })).collect(),
            );
        }
        self
    }

    /// Make count/max/ping queries fail.
    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Make deletes fail.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Make inserts fail.
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Behave like an engine without row deletion.
    pub fn set_no_delete(&self, no_delete: bool) {
        self.no_delete.store(no_delete, Ordering::SeqCst);
    }

    /// Number of insert statements received, failed ones included.
    pub fn insert_calls(&self) -> u64 {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Number of delete statements received, failed ones included.
    pub fn delete_calls(&self) -> u64 {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of the rows in `table`.
    pub async fn rows(&self, table: &Table) -> Vec<Value> {
        self.tables
            .lock()
            .await
            .get(table.name)
            .cloned()
            .unwrap_or_default()
    }

    /// Identifiers in `table`, in storage order.
    pub async fn ids(&self, table: &Table) -> Vec<u64> {
        self.rows(table)
            .await
            .iter()
            .filter_map(|row| row.get(table.id_column).and_then(Value::as_u64))
            .collect()
    }

    fn check_queries(&self) -> Result<(), StoreError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Injected("query".to_string()));
        }
        Ok(())
    }
}

/// Sort key for a row's time column; DateTime and Date text both order lexically.
fn time_key<'a>(row: &'a Value, table: &Table) -> &'a str {
    row.get(table.time_column)
        .and_then(Value::as_str)
        .unwrap_or("")
}

fn parse_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_queries()
    }

    async fn count(&self, table: &Table) -> Result<u64, StoreError> {
        self.check_queries()?;
        let tables = self.tables.lock().await;
        Ok(tables.get(table.name).map_or(0, |rows| rows.len() as u64))
    }

    async fn count_recent(&self, table: &Table, window: Duration) -> Result<u64, StoreError> {
        self.check_queries()?;
        let cutoff = Utc::now().naive_utc()
            - chrono::Duration::from_std(window).unwrap_or(chrono::Duration::zero());
        let tables = self.tables.lock().await;
        let count = tables.get(table.name).map_or(0, |rows| {
            rows.iter()
                .filter_map(|row| parse_time(time_key(row, table)))
                .filter(|ts| *ts >= cutoff)
                .count()
        });
        Ok(count as u64)
    }

    async fn max_id(&self, table: &Table) -> Result<u64, StoreError> {
        self.check_queries()?;
        let tables = self.tables.lock().await;
        let max = tables.get(table.name).and_then(|rows| {
            rows.iter()
                .filter_map(|row| row.get(table.id_column).and_then(Value::as_u64))
                .max()
        });
        Ok(max.unwrap_or(0))
    }

    fn supports_delete(&self, _table: &Table) -> bool {
        !self.no_delete.load(Ordering::SeqCst)
    }

    async fn delete_oldest(&self, table: &Table, rows: u64) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.no_delete.load(Ordering::SeqCst) {
            return Err(StoreError::Unsupported(format!("DELETE FROM {}", table.name)));
        }
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Injected("delete".to_string()));
        }

        let mut tables = self.tables.lock().await;
        if let Some(stored) = tables.get_mut(table.name) {
            stored.sort_by(|a, b| time_key(a, table).cmp(time_key(b, table)));
            let n = (rows as usize).min(stored.len());
            stored.drain(..n);
        }
        Ok(())
    }

    async fn insert_rows(&self, table: &Table, rows: &[Value]) -> Result<(), StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Injected("insert".to_string()));
        }

        let mut tables = self.tables.lock().await;
        tables
            .entry(table.name)
            .or_default()
            .extend(rows.iter().cloned());
        Ok(())
    }

    async fn create_table(&self, table: &Table) -> Result<(), StoreError> {
        self.check_queries()?;
        self.tables.lock().await.entry(table.name).or_default();
        Ok(())
    }
}
