use super::{FieldRule, check_update};
use crate::changeset::{ValidationCode, ValidationError, ValidationErrors};
use crate::clause::{ColumnNameMap, build_set_clause, build_where_clause};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::JOB_SEARCH;
use crate::row::{FromRow, RowExt};
use crate::validate::JobSearch;
use crate::value::FieldMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COLUMNS: &str = "id, title, salary, equity, company_handle";

const UPDATABLE: &[(&str, FieldRule)] = &[
    ("title", FieldRule::RequiredText),
    ("salary", FieldRule::Count),
    ("equity", FieldRule::Fraction),
];

/// A job row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// Input for [`Job::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl NewJob {
    pub fn validate(&self) -> JoblyResult<()> {
        let mut errs = ValidationErrors::default();
        if self.title.trim().is_empty() {
            errs.push(ValidationError::new("title", ValidationCode::Required, "title is required"));
        }
        if self.company_handle.trim().is_empty() {
            errs.push(ValidationError::new(
                "companyHandle",
                ValidationCode::Required,
                "companyHandle is required",
            ));
        }
        if self.salary.is_some_and(|s| s < 0) {
            errs.push(ValidationError::new(
                "salary",
                ValidationCode::Range,
                "salary must be greater than or equal to 0",
            ));
        }
        if self
            .equity
            .is_some_and(|e| e < Decimal::ZERO || e > Decimal::ONE)
        {
            errs.push(ValidationError::new(
                "equity",
                ValidationCode::Range,
                "equity must be between 0 and 1",
            ));
        }
        errs.into_result()
    }
}

impl Job {
    /// Insert a job for an existing company.
    ///
    /// Fails with `BadRequest` when `company_handle` names no company.
    pub async fn create(conn: &impl GenericClient, data: &NewJob) -> JoblyResult<Job> {
        data.validate()?;

        let company = conn
            .query_opt_tagged(
                "job.create.check",
                "SELECT handle FROM companies WHERE handle = $1",
                &[&data.company_handle],
            )
            .await?;
        if company.is_none() {
            return Err(JoblyError::bad_request(format!(
                "No company with handle: {}",
                data.company_handle
            )));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        let row = conn
            .query_one_tagged(
                "job.create",
                &sql,
                &[&data.title, &data.salary, &data.equity, &data.company_handle],
            )
            .await?;

        let job = Job::from_row(&row)?;
        tracing::debug!(
            target: "jobly.model",
            id = job.id,
            company = %job.company_handle,
            "created job"
        );
        Ok(job)
    }

    /// All jobs matching `search`, ordered by title.
    pub async fn find_all(conn: &impl GenericClient, search: &JobSearch) -> JoblyResult<Vec<Job>> {
        let filter = build_where_clause(&search.to_filters(), &JOB_SEARCH)?;

        let sql = format!("SELECT {COLUMNS} FROM jobs {} ORDER BY title, id", filter.clause);
        let rows = conn
            .query_tagged("job.find_all", &sql, &filter.params_ref())
            .await?;
        rows.iter().map(Job::from_row).collect()
    }

    /// Fails with `NotFound` for an unknown id.
    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        let row = conn
            .query_opt_tagged("job.get", &sql, &[&id])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    pub(crate) async fn for_company(
        conn: &impl GenericClient,
        handle: &str,
    ) -> JoblyResult<Vec<Job>> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE company_handle = $1 ORDER BY id");
        let rows = conn
            .query_tagged("job.for_company", &sql, &[&handle])
            .await?;
        rows.iter().map(Job::from_row).collect()
    }

    /// Partially update `title`, `salary` and `equity`.
    ///
    /// `id` and `companyHandle` cannot change.
    pub async fn update(conn: &impl GenericClient, id: i32, data: &FieldMap) -> JoblyResult<Job> {
        check_update(data, UPDATABLE)?;
        let mut set = build_set_clause(data, &ColumnNameMap::empty())?;
        let id_idx = set.push(id);

        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${id_idx} RETURNING {COLUMNS}",
            set.clause
        );
        let row = conn
            .query_opt_tagged("job.update", &sql, &set.params_ref())
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;

        tracing::debug!(target: "jobly.model", id, fields = data.len(), "updated job");
        Job::from_row(&row)
    }

    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        let deleted = conn
            .execute_tagged("job.remove", "DELETE FROM jobs WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(JoblyError::not_found(format!("No job: {id}")));
        }
        tracing::debug!(target: "jobly.model", id, "removed job");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::RecordingClient;
    use std::str::FromStr;

    fn new_job() -> NewJob {
        NewJob {
            title: "worker".into(),
            salary: Some(100000),
            equity: Some(Decimal::ZERO),
            company_handle: "c1".into(),
        }
    }

    #[test]
    fn valid_job_passes() {
        assert!(new_job().validate().is_ok());
    }

    #[test]
    fn equity_above_one_is_rejected() {
        let job = NewJob {
            equity: Some(Decimal::from_str("1.5").unwrap()),
            ..new_job()
        };
        let err = job.validate().unwrap_err();
        assert!(matches!(err, JoblyError::BadRequest(msg) if msg == "equity must be between 0 and 1"));
    }

    #[test]
    fn missing_title_and_negative_salary() {
        let job = NewJob {
            title: String::new(),
            salary: Some(-1),
            ..new_job()
        };
        let JoblyError::BadRequest(msg) = job.validate().unwrap_err() else {
            panic!("expected BadRequest");
        };
        assert!(msg.contains("title is required"));
        assert!(msg.contains("salary must be greater than or equal to 0"));
    }

    #[test]
    fn equity_serializes_as_string() {
        let job = Job {
            id: 1,
            title: "testJob1".into(),
            salary: Some(100000),
            equity: Some(Decimal::from_str("0.01").unwrap()),
            company_handle: "c3".into(),
        };
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["equity"], "0.01");
        assert_eq!(json["companyHandle"], "c3");
    }

    #[test]
    fn new_job_reads_string_equity() {
        let job: NewJob = serde_json::from_str(
            r#"{"title": "newJobTest", "salary": 100000, "equity": "0.01", "companyHandle": "c1"}"#,
        )
        .unwrap();
        assert_eq!(job.equity, Some(Decimal::from_str("0.01").unwrap()));
    }

    #[tokio::test]
    async fn update_rejects_bad_values_without_touching_the_database() {
        let client = RecordingClient::default();

        let data: FieldMap = serde_json::from_str(r#"{"title": 5, "equity": "2"}"#).unwrap();
        let err = Job::update(&client, 1, &data).await.unwrap_err();
        assert!(matches!(
            err,
            JoblyError::BadRequest(msg)
                if msg == "title must be a string; equity must be between 0 and 1"
        ));

        let data = FieldMap::new().with("salary", -10);
        assert!(Job::update(&client, 1, &data).await.unwrap_err().is_client_error());

        assert!(client.statements().is_empty());
    }

    #[tokio::test]
    async fn update_binds_the_id_last() {
        let client = RecordingClient::default();
        let data = FieldMap::new().with("salary", 150000).with("equity", "0.5");

        let err = Job::update(&client, 7, &data).await.unwrap_err();
        assert!(matches!(err, JoblyError::NotFound(msg) if msg == "No job: 7"));
        assert_eq!(
            client.statements(),
            vec![(
                format!(r#"UPDATE jobs SET "salary"=$1, "equity"=$2 WHERE id = $3 RETURNING {COLUMNS}"#),
                3
            )]
        );
    }
}
