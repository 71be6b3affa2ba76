use super::{FieldRule, check_update};
use crate::changeset::{ValidationCode, ValidationError, ValidationErrors};
use crate::clause::{ColumnNameMap, build_set_clause, build_where_clause};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::COMPANY_SEARCH;
use crate::models::Job;
use crate::row::{FromRow, RowExt};
use crate::validate::{CompanySearch, is_url};
use crate::value::FieldMap;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

static COLUMN_NAMES: ColumnNameMap<'static> =
    ColumnNameMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

const UPDATABLE: &[(&str, FieldRule)] = &[
    ("name", FieldRule::RequiredText),
    ("description", FieldRule::Text),
    ("numEmployees", FieldRule::Count),
    ("logoUrl", FieldRule::Url),
];

/// A company row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Input for [`Company::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn validate(&self) -> JoblyResult<()> {
        let mut errs = ValidationErrors::default();
        if self.handle.trim().is_empty() {
            errs.push(ValidationError::new(
                "handle",
                ValidationCode::Required,
                "handle is required",
            ));
        }
        if self.name.trim().is_empty() {
            errs.push(ValidationError::new("name", ValidationCode::Required, "name is required"));
        }
        if self.num_employees.is_some_and(|n| n < 0) {
            errs.push(ValidationError::new(
                "numEmployees",
                ValidationCode::Range,
                "numEmployees must be greater than or equal to 0",
            ));
        }
        if let Some(url) = &self.logo_url {
            if !is_url(url) {
                errs.push(ValidationError::new(
                    "logoUrl",
                    ValidationCode::Url,
                    "logoUrl must be a URL",
                ));
            }
        }
        errs.into_result()
    }
}

/// A company together with its jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

impl Company {
    /// Insert a company. Fails with `BadRequest` if the handle is taken.
    pub async fn create(conn: &impl GenericClient, data: &NewCompany) -> JoblyResult<Company> {
        data.validate()?;

        let existing = conn
            .query_opt_tagged(
                "company.create.check",
                "SELECT handle FROM companies WHERE handle = $1",
                &[&data.handle],
            )
            .await?;
        if existing.is_some() {
            return Err(JoblyError::bad_request(format!(
                "Duplicate company: {}",
                data.handle
            )));
        }

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        let row = conn
            .query_one_tagged(
                "company.create",
                &sql,
                &[
                    &data.handle,
                    &data.name,
                    &data.description,
                    &data.num_employees,
                    &data.logo_url,
                ],
            )
            .await?;

        let company = Company::from_row(&row)?;
        tracing::debug!(target: "jobly.model", handle = %company.handle, "created company");
        Ok(company)
    }

    /// All companies matching `search`, ordered by name.
    pub async fn find_all(
        conn: &impl GenericClient,
        search: &CompanySearch,
    ) -> JoblyResult<Vec<Company>> {
        search.validate()?;
        let filter = build_where_clause(&search.to_filters(), &COMPANY_SEARCH)?;

        let sql = format!("SELECT {COLUMNS} FROM companies {} ORDER BY name", filter.clause);
        let rows = conn
            .query_tagged("company.find_all", &sql, &filter.params_ref())
            .await?;
        rows.iter().map(Company::from_row).collect()
    }

    /// A company and its jobs. Fails with `NotFound` for an unknown handle.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
        let row = conn
            .query_opt_tagged("company.get", &sql, &[&handle])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        let company = Company::from_row(&row)?;
        let jobs = Job::for_company(conn, handle).await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Partially update `name`, `description`, `numEmployees` and `logoUrl`.
    ///
    /// Empty `data` fails with `NoDataProvided`. Other keys, and values the
    /// column cannot take, fail with `BadRequest`.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        data: &FieldMap,
    ) -> JoblyResult<Company> {
        check_update(data, UPDATABLE)?;
        let mut set = build_set_clause(data, &COLUMN_NAMES)?;
        let handle_idx = set.push(handle);

        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${handle_idx} RETURNING {COLUMNS}",
            set.clause
        );
        let row = conn
            .query_opt_tagged("company.update", &sql, &set.params_ref())
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;

        tracing::debug!(
            target: "jobly.model",
            handle,
            fields = data.len(),
            "updated company"
        );
        Company::from_row(&row)
    }

    /// Delete a company (and, by cascade, its jobs).
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        let deleted = conn
            .execute_tagged(
                "company.remove",
                "DELETE FROM companies WHERE handle = $1",
                &[&handle],
            )
            .await?;
        if deleted == 0 {
            return Err(JoblyError::not_found(format!("No company: {handle}")));
        }
        tracing::debug!(target: "jobly.model", handle, "removed company");
        Ok(())
    }
}
