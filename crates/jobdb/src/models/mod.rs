//! Domain models backed by the shared SQL builders.
//!
//! Each model owns its table's statements and exposes async operations
//! over any [`GenericClient`](crate::client::GenericClient). Search input
//! arrives as raw text and is interpreted by the builders in `sql`;
//! partial updates arrive as a [`Patch`](crate::sql::Patch).

pub mod company;
pub mod job;

pub use company::{Company, CompanySearch, CompanyWithJobs, NewCompany};
pub use job::{Job, JobSearch, JobSummary, NewJob};
