//! Row-to-struct mapping for query results.

use crate::error::DbResult;
use tokio_postgres::Row;

/// Conversion from a database row into a model struct.
///
/// Implemented by hand per model; every statement in a model selects the
/// same column list, so one impl covers all of its operations.
///
/// ```ignore
/// use jobdb::{DbResult, FromRow, RowExt};
/// use tokio_postgres::Row;
///
/// struct Applicant {
///     id: i64,
///     username: String,
/// }
///
/// impl FromRow for Applicant {
///     fn from_row(row: &Row) -> DbResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             username: row.try_get_column("username")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> DbResult<Self>;
}

/// Column access that reports which column failed to decode.
pub trait RowExt {
    /// Get a typed column value; failures map to [`DbError::Decode`]
    /// carrying the column name.
    ///
    /// [`DbError::Decode`]: crate::error::DbError::Decode
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| crate::error::DbError::decode(column, e.to_string()))
    }
}
