//! Runtime configuration loaded from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | required |
//! | `JOBLY_POOL_MAX_SIZE` | `16` |
//! | `JOBLY_SQL_LOG_MAX_LEN` | `200` (`0` disables truncation) |
//!
//! A `.env` file in the working directory is read first if present.

use crate::error::{JoblyError, JoblyResult};

const DEFAULT_POOL_MAX_SIZE: usize = 16;
const DEFAULT_SQL_LOG_MAX_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoblyConfig {
    pub database_url: String,
    pub pool_max_size: usize,
    /// Maximum SQL length in log events; `None` logs full statements.
    pub sql_log_max_len: Option<usize>,
}

impl JoblyConfig {
    /// Config for `database_url` with every other setting at its default.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
            sql_log_max_len: Some(DEFAULT_SQL_LOG_MAX_LEN),
        }
    }

    /// Load from `.env` (if present) and the process environment.
    pub fn from_env() -> JoblyResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JoblyResult<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| JoblyError::Config("DATABASE_URL is not set".to_string()))?;

        let mut config = Self::with_database_url(database_url);

        if let Some(raw) = lookup("JOBLY_POOL_MAX_SIZE") {
            let size = parse_usize("JOBLY_POOL_MAX_SIZE", &raw)?;
            if size == 0 {
                return Err(JoblyError::Config(
                    "JOBLY_POOL_MAX_SIZE must be at least 1".to_string(),
                ));
            }
            config.pool_max_size = size;
        }

        if let Some(raw) = lookup("JOBLY_SQL_LOG_MAX_LEN") {
            let len = parse_usize("JOBLY_SQL_LOG_MAX_LEN", &raw)?;
            config.sql_log_max_len = (len > 0).then_some(len);
        }

        Ok(config)
    }
}

fn parse_usize(key: &str, raw: &str) -> JoblyResult<usize> {
    raw.trim()
        .parse()
        .map_err(|_| JoblyError::Config(format!("{key} must be a non-negative integer, got {raw:?}")))
}
