//! # jobdb
//!
//! PostgreSQL data access for a job board: companies and the jobs they
//! post, with partial updates and filtered search built on positional
//! parameter binding.
//!
//! ## Design
//!
//! - **SQL explicit**: statements are plain text; only the dynamic parts
//!   (SET clauses, WHERE filters) are assembled, and every caller value
//!   travels as a `$n` bound parameter
//! - **Sparse updates**: a [`Patch`] holds just the fields a caller sent,
//!   so an update never touches omitted columns
//! - **Declared filters**: search endpoints declare their optional filters
//!   once, in order; absent filters vanish from the SQL and the remaining
//!   placeholders renumber densely
//! - **Transaction-friendly**: every model operation takes any
//!   [`GenericClient`], so the same code runs on a connection, a pooled
//!   client, or inside a transaction
//!
//! ## Example
//!
//! ```ignore
//! use jobdb::{Company, CompanySearch, Patch};
//!
//! let pool = jobdb::create_pool(&std::env::var("DATABASE_URL")?)?;
//! let client = pool.get().await?;
//!
//! // Filtered search: only supplied filters reach the SQL.
//! let search = CompanySearch {
//!     min_employees: Some("10".into()),
//!     ..Default::default()
//! };
//! let companies = Company::find_all(&client, &search).await?;
//!
//! // Partial update: only supplied fields are written.
//! let patch = Patch::new().set("numEmployees", 42i64);
//! let company = Company::update(&client, "acme", &patch).await?;
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod row;
pub mod sql;

pub use client::GenericClient;
pub use error::{DbError, DbResult};
pub use models::{
    Company, CompanySearch, CompanyWithJobs, Job, JobSearch, JobSummary, NewCompany, NewJob,
};
pub use row::{FromRow, RowExt};
pub use sql::{ColumnMap, Filter, Fragment, Null, Param, ParamList, Patch, SearchQb};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
