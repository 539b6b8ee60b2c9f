//! Job model: CRUD and filtered search over the `jobs` table.

use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::row::{FromRow, RowExt};
use crate::sql::{ColumnMap, Fragment, Patch, SearchQb};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tracing::debug;

const BASE_SELECT: &str = "SELECT id, title, salary, equity, company_handle FROM jobs";

const INSERT: &str = "INSERT INTO jobs (title, salary, equity, company_handle) \
     VALUES ($1, $2, $3, $4) \
     RETURNING id, title, salary, equity, company_handle";

const GET: &str = "SELECT id, title, salary, equity, company_handle FROM jobs WHERE id = $1";

const FOR_COMPANY: &str =
    "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id";

const DELETE: &str = "DELETE FROM jobs WHERE id = $1 RETURNING id";

/// A job row.
///
/// Equity is NUMERIC in the database and round-trips as [`Decimal`]; in
/// JSON it serializes as a string, keeping the stored scale intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// A job without its company handle, for nesting under a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: i64,
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<Decimal>,
}

impl FromRow for JobSummary {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
        })
    }
}

/// Input for creating a job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i64>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Raw job search input, as it arrives from a query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobSearch {
    pub title: Option<String>,
    pub min_salary: Option<String>,
    pub has_equity: Option<String>,
}

impl Job {
    /// Insert a job and return the stored row, id included.
    ///
    /// An unknown company handle surfaces as [`DbError::ForeignKeyViolation`]
    /// from the `company_handle` reference.
    pub async fn create(db: &impl GenericClient, job: &NewJob) -> DbResult<Job> {
        debug!(title = %job.title, company = %job.company_handle, "creating job");
        let row = db
            .query_one(
                INSERT,
                &[&job.title, &job.salary, &job.equity, &job.company_handle],
            )
            .await?;
        Job::from_row(&row)
    }

    /// List jobs matching the search input, sorted by title whenever any
    /// filter applies.
    ///
    /// `hasEquity` only takes effect when its raw text is exactly `"true"`;
    /// it then restricts results to jobs with equity above zero.
    pub async fn find_all(db: &impl GenericClient, search: &JobSearch) -> DbResult<Vec<Job>> {
        let frag = Self::search_fragment(search)?;
        debug!(sql = %frag.sql, params = frag.params.len(), "searching jobs");
        let rows = db.query(&frag.sql, &frag.params_ref()).await?;
        rows.iter().map(Job::from_row).collect()
    }

    /// Fetch a job by id.
    pub async fn get(db: &impl GenericClient, id: i64) -> DbResult<Job> {
        let row = db
            .query_opt(GET, &[&id])
            .await?
            .ok_or_else(|| Self::missing(id))?;
        Job::from_row(&row)
    }

    /// List a company's jobs, oldest first.
    pub async fn for_company(db: &impl GenericClient, handle: &str) -> DbResult<Vec<JobSummary>> {
        let rows = db.query(FOR_COMPANY, &[&handle]).await?;
        rows.iter().map(JobSummary::from_row).collect()
    }

    /// Apply a partial update and return the stored row.
    ///
    /// Job fields keep their column names, so the patch needs no renames.
    /// The id and company handle are not updatable through this path.
    pub async fn update(db: &impl GenericClient, id: i64, patch: &Patch) -> DbResult<Job> {
        let frag = Self::update_statement(id, patch)?;
        debug!(sql = %frag.sql, "updating job");
        let row = db
            .query_opt(&frag.sql, &frag.params_ref())
            .await?
            .ok_or_else(|| Self::missing(id))?;
        Job::from_row(&row)
    }

    /// Delete a job by id.
    pub async fn remove(db: &impl GenericClient, id: i64) -> DbResult<()> {
        let row = db.query_opt(DELETE, &[&id]).await?;
        match row {
            Some(_) => Ok(()),
            None => Err(Self::missing(id)),
        }
    }

    fn search_fragment(search: &JobSearch) -> DbResult<Fragment> {
        SearchQb::new(BASE_SELECT)
            .at_least::<i64>("minSalary", "salary", search.min_salary.as_deref())
            .flag(
                "hasEquity",
                "equity > ?",
                search.has_equity.as_deref(),
                Decimal::ZERO,
            )
            .contains("title", "title", search.title.as_deref())
            .order_by("title")
            .build()
    }

    fn update_statement(id: i64, patch: &Patch) -> DbResult<Fragment> {
        let Fragment {
            sql: assignments,
            mut params,
        } = patch.set_clause(&ColumnMap::new())?;
        let key = params.push(id);
        let sql = format!(
            "UPDATE jobs SET {assignments} WHERE id = ${key} \
             RETURNING id, title, salary, equity, company_handle"
        );
        Ok(Fragment { sql, params })
    }

    fn missing(id: i64) -> DbError {
        DbError::not_found(format!("No job found with id of {id}"))
    }
}
