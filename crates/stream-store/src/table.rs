//! Descriptors of the analytics tables.

/// A target table: its key and time columns plus its DDL column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    /// Monotonic identifier column.
    pub id_column: &'static str,
    /// Column used to order rows by age.
    pub time_column: &'static str,
    /// `(column, ClickHouse type)` in insert order. `DateTime` columns are
    /// pinned to UTC so rows written as UTC text read back correctly on a
    /// server in any timezone.
    pub columns: &'static [(&'static str, &'static str)],
}

pub const EVENTS: Table = Table {
    name: "events",
    id_column: "event_id",
    time_column: "event_timestamp",
    columns: &[
        ("event_id", "UInt64"),
        ("user_id", "UInt64"),
        ("event_type", "LowCardinality(String)"),
        ("event_timestamp", "DateTime('UTC')"),
        ("page_url", "String"),
        ("session_id", "String"),
        ("device_type", "LowCardinality(String)"),
        ("browser", "LowCardinality(String)"),
        ("country", "LowCardinality(String)"),
        ("duration_seconds", "UInt32"),
        ("revenue", "Decimal(10, 2)"),
    ],
};

pub const ORDERS: Table = Table {
    name: "orders",
    id_column: "order_id",
    time_column: "order_timestamp",
    columns: &[
        ("order_id", "UInt64"),
        ("user_id", "UInt64"),
        ("product_id", "UInt64"),
        ("quantity", "UInt32"),
        ("order_date", "Date"),
        ("order_timestamp", "DateTime('UTC')"),
        ("total_amount", "Decimal(10, 2)"),
        ("status", "LowCardinality(String)"),
        ("payment_method", "LowCardinality(String)"),
    ],
};

pub const USERS: Table = Table {
    name: "users",
    id_column: "user_id",
    time_column: "registration_timestamp",
    columns: &[
        ("user_id", "UInt64"),
        ("username", "String"),
        ("email", "String"),
        ("age", "UInt8"),
        ("country", "LowCardinality(String)"),
        ("registration_date", "Date"),
        ("registration_timestamp", "DateTime('UTC')"),
        ("is_premium", "UInt8"),
        ("total_spent", "Decimal(10, 2)"),
    ],
};

pub const PRODUCTS: Table = Table {
    name: "products",
    id_column: "product_id",
    time_column: "created_date",
    columns: &[
        ("product_id", "UInt64"),
        ("product_name", "String"),
        ("category", "LowCardinality(String)"),
        ("price", "Decimal(10, 2)"),
        ("created_date", "Date"),
        ("is_active", "UInt8"),
    ],
};

impl Table {
    /// All tables, in the order statistics are reported.
    pub const ALL: [Table; 4] = [USERS, PRODUCTS, ORDERS, EVENTS];

    /// Generate a `CREATE TABLE IF NOT EXISTS` statement (MergeTree ordered by time then id).
    pub fn create_table_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|(name, ty)| format!("    {name} {ty}"))
            .collect::<Vec<_>>()
            .join(",\n");
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n) ENGINE = MergeTree ORDER BY ({}, {})",
            self.name, columns, self.time_column, self.id_column
        )
    }
}
