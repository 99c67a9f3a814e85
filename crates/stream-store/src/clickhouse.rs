//! ClickHouse over its HTTP interface.
//!
//! Every statement is a `POST /?database=<db>` with basic auth and the SQL as
//! the request body. Scalars come back as `TabSeparated` text; inserts use
//! `JSONEachRow`, one serialized row per line.

use crate::args::ClickHouseArgs;
use crate::error::StoreError;
use crate::store::Store;
use crate::table::Table;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// A [`Store`] backed by a ClickHouse server.
pub struct ClickHouseStore {
    client: Client,
    url: String,
    user: String,
    password: String,
    database: String,
    delete_enabled: bool,
}

impl ClickHouseStore {
    /// Build a store from connection arguments. No request is made yet.
    pub fn new(args: &ClickHouseArgs) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(args.clickhouse_timeout))
            .build()?;

        Ok(Self {
            client,
            url: args.url(),
            user: args.clickhouse_user.clone(),
            password: args.clickhouse_password.clone(),
            database: args.clickhouse_db.clone(),
            delete_enabled: !args.clickhouse_disable_delete,
        })
    }

    /// Execute one statement and return the trimmed response body.
    pub async fn execute(&self, sql: &str) -> Result<String, StoreError> {
        debug!("ClickHouse query: {}", first_line(sql));

        let response = self
            .client
            .post(&self.url)
            .query(&[("database", self.database.as_str())])
            .basic_auth(&self.user, Some(&self.password))
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(sql.to_string())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(StoreError::Query {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(body.trim().to_string())
    }

    async fn scalar(&self, sql: &str) -> Result<u64, StoreError> {
        let text = self.execute(sql).await?;
        parse_scalar(&text)
    }
}

#[async_trait]
impl Store for ClickHouseStore {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let answer = self.execute("SELECT 1").await?;
        if answer == "1" {
            Ok(())
        } else {
            Err(StoreError::Parse(answer))
        }
    }

    async fn count(&self, table: &Table) -> Result<u64, StoreError> {
        self.scalar(&count_sql(table)).await
    }

    async fn count_recent(&self, table: &Table, window: Duration) -> Result<u64, StoreError> {
        self.scalar(&count_recent_sql(table, window)).await
    }

    async fn max_id(&self, table: &Table) -> Result<u64, StoreError> {
        self.scalar(&max_id_sql(table)).await
    }

    fn supports_delete(&self, _table: &Table) -> bool {
        self.delete_enabled
    }

    async fn delete_oldest(&self, table: &Table, rows: u64) -> Result<(), StoreError> {
        if !self.delete_enabled {
            return Err(StoreError::Unsupported(format!("DELETE FROM {}", table.name)));
        }
        self.execute(&delete_oldest_sql(table, rows)).await?;
        Ok(())
    }

    async fn insert_rows(&self, table: &Table, rows: &[Value]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        let sql = insert_sql(table, rows)?;
        self.execute(&sql).await?;
        Ok(())
    }

    async fn create_table(&self, table: &Table) -> Result<(), StoreError> {
        self.execute(&table.create_table_sql()).await?;
        Ok(())
    }
}

/// Parse a single unsigned scalar; an empty body counts as zero.
pub fn parse_scalar(text: &str) -> Result<u64, StoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }
    text.parse::<u64>()
        .map_err(|_| StoreError::Parse(text.to_string()))
}

pub fn count_sql(table: &Table) -> String {
    format!("SELECT count() FROM {}", table.name)
}

pub fn count_recent_sql(table: &Table, window: Duration) -> String {
    format!(
        "SELECT count() FROM {} WHERE {} >= now() - INTERVAL {} SECOND",
        table.name,
        table.time_column,
        window.as_secs()
    )
}

pub fn max_id_sql(table: &Table) -> String {
    format!("SELECT max({}) FROM {}", table.id_column, table.name)
}

pub fn delete_oldest_sql(table: &Table, rows: u64) -> String {
    format!(
        "DELETE FROM {name} WHERE {id} IN (SELECT {id} FROM {name} ORDER BY {time} ASC LIMIT {rows})",
        name = table.name,
        id = table.id_column,
        time = table.time_column,
    )
}

/// Render a `JSONEachRow` insert: the statement header, then one row per line.
pub fn insert_sql(table: &Table, rows: &[Value]) -> Result<String, StoreError> {
    let mut sql = format!("INSERT INTO {} FORMAT JSONEachRow\n", table.name);
    for row in rows {
        sql.push_str(&serde_json::to_string(row)?);
        sql.push('\n');
    }
    Ok(sql)
}

fn first_line(sql: &str) -> &str {
    sql.lines().next().unwrap_or("")
}
