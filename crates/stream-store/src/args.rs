//! CLI/environment arguments for the ClickHouse connection.

use clap::Args;

/// ClickHouse connection arguments.
///
/// Every value can come from the environment, and the defaults match the
/// demo deployment so the tool runs with zero configuration.
///
/// Timestamps are sent as UTC text. Tables created by `seed --create-tables`
/// declare `DateTime('UTC')`; pre-existing tables with a bare `DateTime`
/// column need a server running in UTC.
#[derive(Args, Clone, Debug)]
pub struct ClickHouseArgs {
    /// ClickHouse host
    #[arg(long, env = "CLICKHOUSE_HOST", default_value = "localhost")]
    pub clickhouse_host: String,

    /// ClickHouse HTTP port
    #[arg(long, env = "CLICKHOUSE_PORT", default_value = "8123")]
    pub clickhouse_port: u16,

    /// ClickHouse user
    #[arg(long, env = "CLICKHOUSE_USER", default_value = "demo_user")]
    pub clickhouse_user: String,

    /// ClickHouse password
    #[arg(long, env = "CLICKHOUSE_PASSWORD", default_value = "demo_password")]
    pub clickhouse_password: String,

    /// ClickHouse database
    #[arg(long, env = "CLICKHOUSE_DB", default_value = "demo_db")]
    pub clickhouse_db: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "CLICKHOUSE_TIMEOUT", default_value = "10")]
    pub clickhouse_timeout: u64,

    /// Never issue DELETE statements (for engines without lightweight deletes)
    #[arg(long, env = "CLICKHOUSE_DISABLE_DELETE")]
    pub clickhouse_disable_delete: bool,
}

impl ClickHouseArgs {
    /// Base HTTP URL of the server.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.clickhouse_host, self.clickhouse_port)
    }

    /// Connection string with the password masked, for logging.
    pub fn display_url(&self) -> String {
        format!(
            "http://{}:***@{}:{}/{}",
            self.clickhouse_user, self.clickhouse_host, self.clickhouse_port, self.clickhouse_db
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ClickHouseArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["test"]);

        assert_eq!(cli.args.url(), "http://localhost:8123");
        assert_eq!(cli.args.clickhouse_db, "demo_db");
        assert_eq!(cli.args.clickhouse_timeout, 10);
        assert!(!cli.args.clickhouse_disable_delete);
    }

    #[test]
    fn test_display_url_masks_password() {
        let cli = TestCli::parse_from([
            "test",
            "--clickhouse-host",
            "ch",
            "--clickhouse-password",
            "s3cret",
        ]);

        let shown = cli.args.display_url();
        assert_eq!(shown, "http://demo_user:***@ch:8123/demo_db");
        assert!(!shown.contains("s3cret"));
    }
}
