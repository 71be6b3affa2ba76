//! Error types for jobly

use thiserror::Error;

/// Result type alias for jobly operations
pub type JoblyResult<T> = Result<T, JoblyError>;

/// Error types for clause building, validation and database access
#[derive(Debug, Error)]
pub enum JoblyError {
    /// A partial update was requested with zero fields
    #[error("No data provided")]
    NoDataProvided,

    /// A search filter key is not part of the entity's filter spec
    #[error("Unknown filter key: {0}")]
    UnknownFilterKey(String),

    /// Malformed or inconsistent request input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl JoblyError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the error was caused by the request rather than the server.
    ///
    /// Route handlers map these to 4xx responses.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NoDataProvided
                | Self::UnknownFilterKey(_)
                | Self::BadRequest(_)
                | Self::NotFound(_)
                | Self::UniqueViolation(_)
                | Self::ForeignKeyViolation(_)
                | Self::CheckViolation(_)
        )
    }

    /// Parse a tokio_postgres error into a more specific JoblyError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for JoblyError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_errors_are_client_errors() {
        assert!(JoblyError::NoDataProvided.is_client_error());
        assert!(JoblyError::UnknownFilterKey("foo".into()).is_client_error());
        assert!(JoblyError::bad_request("nope").is_client_error());
        assert!(JoblyError::not_found("job 1").is_client_error());
    }

    #[test]
    fn setup_errors_are_not_client_errors() {
        assert!(!JoblyError::Config("missing DATABASE_URL".into()).is_client_error());
        assert!(!JoblyError::decode("salary", "bad int").is_client_error());
    }

    #[test]
    fn unknown_filter_key_names_the_key() {
        let err = JoblyError::UnknownFilterKey("minSallary".into());
        assert_eq!(err.to_string(), "Unknown filter key: minSallary");
    }
}
