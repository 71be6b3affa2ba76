//! # jobly
//!
//! Company and job listings over PostgreSQL.
//!
//! ## SQL fragments
//!
//! Partial updates and searches take a variable set of fields. The
//! [`clause`] module turns those fields into parameterized SQL fragments,
//! so no caller-provided value is ever spliced into SQL text:
//!
//! ```ignore
//! use jobly::{FieldMap, COMPANY_SEARCH, build_set_clause, build_where_clause, ColumnNameMap};
//!
//! let data = FieldMap::new().with("numEmployees", 10).with("name", "Acme");
//! let set = build_set_clause(&data, &ColumnNameMap::new(&[("numEmployees", "num_employees")]))?;
//! assert_eq!(set.clause, r#""num_employees"=$1, "name"=$2"#);
//!
//! let filters = FieldMap::new().with("minEmployees", 2).with("nameLike", "net");
//! let filter = build_where_clause(&filters, &COMPANY_SEARCH)?;
//! assert_eq!(filter.clause, "WHERE (num_employees >= $1 AND name ILIKE $2)");
//! ```
//!
//! ## Models
//!
//! [`models::Company`] and [`models::Job`] run against any [`GenericClient`]:
//! a `tokio_postgres` client or transaction, a pooled client, or a
//! [`TracingClient`] wrapping any of those.
//!
//! ```ignore
//! let config = JoblyConfig::from_env()?;
//! let pool = jobly::create_pool_with_config(&config)?;
//! let conn = TracingClient::from_config(pool.get().await?, &config);
//!
//! let search = JobSearch::from_query([("minSalary", "150000"), ("hasEquity", "true")])?;
//! let jobs = Job::find_all(&conn, &search).await?;
//! ```

pub mod changeset;
pub mod clause;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod ident;
pub mod models;
pub mod monitor;
pub mod row;
pub mod validate;
pub mod value;

pub use changeset::{ValidationCode, ValidationError, ValidationErrors};
pub use clause::{ClauseResult, ColumnNameMap, build_set_clause, build_where_clause};
pub use client::GenericClient;
pub use config::JoblyConfig;
pub use error::{JoblyError, JoblyResult};
pub use filter::{COMPANY_SEARCH, FilterDef, FilterSpec, JOB_SEARCH, ValueTransform};
pub use ident::quote_ident;
pub use models::{Company, CompanyDetail, Job, NewCompany, NewJob};
pub use monitor::TracingClient;
pub use row::{FromRow, RowExt};
pub use validate::{CompanySearch, JobSearch};
pub use value::{FieldMap, SqlValue};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

// Re-export deadpool-postgres types when pool feature is enabled
#[cfg(feature = "pool")]
pub use deadpool_postgres::{Pool, PoolError};
