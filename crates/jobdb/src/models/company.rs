//! Company model: CRUD and filtered search over the `companies` table.

use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::models::job::{Job, JobSummary};
use crate::row::{FromRow, RowExt};
use crate::sql::{ColumnMap, Fragment, Patch, SearchQb};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tracing::debug;

const BASE_SELECT: &str =
    "SELECT handle, name, description, num_employees, logo_url FROM companies";

const INSERT: &str = "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
     VALUES ($1, $2, $3, $4, $5) \
     RETURNING handle, name, description, num_employees, logo_url";

const GET: &str = "SELECT handle, name, description, num_employees, logo_url \
     FROM companies WHERE handle = $1";

const DELETE: &str = "DELETE FROM companies WHERE handle = $1 RETURNING handle";

/// A company row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i64>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Input for creating a company.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i64>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Raw company search input, as it arrives from a query string.
///
/// All values are optional text; interpretation (presence, numeric parsing)
/// happens in the search builder, not here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanySearch {
    pub name: Option<String>,
    pub min_employees: Option<String>,
    pub max_employees: Option<String>,
}

/// A company together with its jobs, as returned by [`Company::get_with_jobs`].
#[derive(Debug, Clone, Serialize)]
pub struct CompanyWithJobs {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

impl Company {
    /// Insert a company and return the stored row.
    ///
    /// A duplicate handle surfaces as [`DbError::UniqueViolation`] from the
    /// table's primary key, without a read-before-write check.
    pub async fn create(db: &impl GenericClient, company: &NewCompany) -> DbResult<Company> {
        debug!(handle = %company.handle, "creating company");
        let row = db
            .query_one(
                INSERT,
                &[
                    &company.handle,
                    &company.name,
                    &company.description,
                    &company.num_employees,
                    &company.logo_url,
                ],
            )
            .await?;
        Company::from_row(&row)
    }

    /// List companies matching the search input, sorted by name whenever
    /// any filter applies.
    pub async fn find_all(
        db: &impl GenericClient,
        search: &CompanySearch,
    ) -> DbResult<Vec<Company>> {
        let frag = Self::search_fragment(search)?;
        debug!(sql = %frag.sql, params = frag.params.len(), "searching companies");
        let rows = db.query(&frag.sql, &frag.params_ref()).await?;
        rows.iter().map(Company::from_row).collect()
    }

    /// Fetch a company by handle.
    pub async fn get(db: &impl GenericClient, handle: &str) -> DbResult<Company> {
        let row = db
            .query_opt(GET, &[&handle])
            .await?
            .ok_or_else(|| Self::missing(handle))?;
        Company::from_row(&row)
    }

    /// Fetch a company by handle along with its jobs.
    pub async fn get_with_jobs(
        db: &impl GenericClient,
        handle: &str,
    ) -> DbResult<CompanyWithJobs> {
        let company = Company::get(db, handle).await?;
        let jobs = Job::for_company(db, handle).await?;
        Ok(CompanyWithJobs { company, jobs })
    }

    /// Apply a partial update and return the stored row.
    ///
    /// Only the fields present in `patch` are written. An empty patch is
    /// rejected with [`DbError::NoData`] before any SQL is issued.
    pub async fn update(
        db: &impl GenericClient,
        handle: &str,
        patch: &Patch,
    ) -> DbResult<Company> {
        let frag = Self::update_statement(handle, patch)?;
        debug!(sql = %frag.sql, "updating company");
        let row = db
            .query_opt(&frag.sql, &frag.params_ref())
            .await?
            .ok_or_else(|| Self::missing(handle))?;
        Company::from_row(&row)
    }

    /// Delete a company by handle.
    pub async fn remove(db: &impl GenericClient, handle: &str) -> DbResult<()> {
        let row = db.query_opt(DELETE, &[&handle]).await?;
        match row {
            Some(_) => Ok(()),
            None => Err(Self::missing(handle)),
        }
    }

    fn search_fragment(search: &CompanySearch) -> DbResult<Fragment> {
        SearchQb::new(BASE_SELECT)
            .at_least::<i64>(
                "minEmployees",
                "num_employees",
                search.min_employees.as_deref(),
            )
            .at_most::<i64>(
                "maxEmployees",
                "num_employees",
                search.max_employees.as_deref(),
            )
            .contains("name", "name", search.name.as_deref())
            .order_by("name")
            .build()
    }

    fn update_statement(handle: &str, patch: &Patch) -> DbResult<Fragment> {
        let Fragment {
            sql: assignments,
            mut params,
        } = patch.set_clause(&Self::column_map())?;
        let key = params.push(handle.to_string());
        let sql = format!(
            "UPDATE companies SET {assignments} WHERE handle = ${key} \
             RETURNING handle, name, description, num_employees, logo_url"
        );
        Ok(Fragment { sql, params })
    }

    fn column_map() -> ColumnMap {
        ColumnMap::new()
            .map("numEmployees", "num_employees")
            .map("logoUrl", "logo_url")
    }

    fn missing(handle: &str) -> DbError {
        DbError::not_found(format!("No company found with handle of {handle}"))
    }
}
