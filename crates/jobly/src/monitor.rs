//! SQL logging via `tracing`.
//!
//! [`TracingClient`] wraps any [`GenericClient`] and emits one event per
//! statement on the `jobly.sql` target, before the statement runs.
//!
//! # Example
//!
//! ```ignore
//! use jobly::{TracingClient, models::Company};
//!
//! let conn = TracingClient::from_config(pool.get().await?, &config);
//! let companies = Company::find_all(&conn, &search).await?;
//! ```

use crate::client::GenericClient;
use crate::config::JoblyConfig;
use crate::error::JoblyResult;
use std::future::Future;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::Level;

/// Truncate a string to at most `max_bytes` bytes on a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// A client wrapper that logs each statement through `tracing`.
#[derive(Debug, Clone)]
pub struct TracingClient<C> {
    inner: C,
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl<C: GenericClient> TracingClient<C> {
    /// Wrap `inner`, logging at `DEBUG` and truncating SQL to 200 bytes.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Wrap `inner`, truncating SQL to `config.sql_log_max_len`.
    pub fn from_config(inner: C, config: &JoblyConfig) -> Self {
        Self {
            max_sql_length: config.sql_log_max_len,
            ..Self::new(inner)
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn emit(&self, tag: Option<&str>, sql: &str, param_count: usize) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    _ => tracing::trace!($($field)*),
                }
            };
        }

        let tag = tag.unwrap_or("-");
        let sql = self.truncate_sql(sql);
        emit_at_level!(
            self.level,
            target: "jobly.sql",
            tag,
            param_count,
            sql = %sql,
        );
    }
}

impl<C: GenericClient> GenericClient for TracingClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<Vec<Row>> {
        self.emit(None, sql, params.len());
        self.inner.query(sql, params).await
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<Row> {
        self.emit(None, sql, params.len());
        self.inner.query_one(sql, params).await
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> JoblyResult<Option<Row>> {
        self.emit(None, sql, params.len());
        self.inner.query_opt(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<u64> {
        self.emit(None, sql, params.len());
        self.inner.execute(sql, params).await
    }

    fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = JoblyResult<Vec<Row>>> + Send {
        self.emit(Some(tag), sql, params.len());
        self.inner.query_tagged(tag, sql, params)
    }

    fn query_one_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = JoblyResult<Row>> + Send {
        self.emit(Some(tag), sql, params.len());
        self.inner.query_one_tagged(tag, sql, params)
    }

    fn query_opt_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = JoblyResult<Option<Row>>> + Send {
        self.emit(Some(tag), sql, params.len());
        self.inner.query_opt_tagged(tag, sql, params)
    }

    fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = JoblyResult<u64>> + Send {
        self.emit(Some(tag), sql, params.len());
        self.inner.execute_tagged(tag, sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::RecordingClient;

    #[test]
    fn truncate_respects_char_boundary() {
        let sql = "SELECT 'é'";
        // 'é' is two bytes starting at index 8
        assert_eq!(truncate_sql_bytes(sql, 9), "SELECT '");
        assert_eq!(truncate_sql_bytes(sql, 100), sql);
    }

    #[test]
    fn config_sets_truncation() {
        let mut config = JoblyConfig::with_database_url("postgres://localhost/jobly");
        config.sql_log_max_len = Some(12);
        let client = TracingClient::from_config(RecordingClient::default(), &config);
        assert_eq!(client.max_sql_length, Some(12));
        assert_eq!(client.level, Level::DEBUG);
        assert_eq!(
            client.truncate_sql("SELECT handle FROM companies"),
            "SELECT handl..."
        );

        config.sql_log_max_len = None;
        let client = TracingClient::from_config(RecordingClient::default(), &config);
        assert_eq!(client.max_sql_length, None);
        assert_eq!(
            client.truncate_sql("SELECT handle FROM companies"),
            "SELECT handle FROM companies"
        );
    }

    #[test]
    fn env_setting_reaches_the_client() {
        let config = JoblyConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/jobly".to_string()),
            "JOBLY_SQL_LOG_MAX_LEN" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();
        let client = TracingClient::from_config(RecordingClient::default(), &config);
        assert_eq!(client.max_sql_length, None);
    }

    #[test]
    fn builder_overrides() {
        let client = TracingClient::new(RecordingClient::default())
            .level(Level::INFO)
            .max_sql_length(8)
            .no_truncate();
        assert_eq!(client.level, Level::INFO);
        assert_eq!(client.max_sql_length, None);
        assert!(client.into_inner().statements().is_empty());
    }

    #[tokio::test]
    async fn statements_pass_through_unchanged() {
        let client = TracingClient::new(RecordingClient::default()).max_sql_length(5);
        let sql = "SELECT 1 WHERE $1 = $2";
        client
            .query_tagged("job.select", sql, &[&1_i32, &2_i32])
            .await
            .unwrap();
        client.execute("DELETE FROM jobs", &[]).await.unwrap();

        assert_eq!(
            client.inner().statements(),
            vec![(sql.to_string(), 2), ("DELETE FROM jobs".to_string(), 0)]
        );
    }
}
