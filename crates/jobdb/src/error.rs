//! Error types for jobdb

use thiserror::Error;

/// Result type alias for jobdb operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Update requested with an empty payload
    #[error("No data provided to update")]
    NoData,

    /// Search filter received raw text it cannot interpret
    #[error("Invalid value for filter '{filter}': {value:?} is not a number")]
    InvalidFilter { filter: String, value: String },

    /// Update payload value that cannot be bound as a SQL parameter
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

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

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl DbError {
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

    /// Create an invalid filter error for a named filter and the raw text it rejected
    pub fn invalid_filter(filter: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidFilter {
            filter: filter.into(),
            value: value.into(),
        }
    }

    /// Create an invalid field error for an update payload entry
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this error rejects caller input (empty payload, bad filter or field value)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Self::NoData | Self::InvalidFilter { .. } | Self::InvalidField { .. }
        )
    }

    /// Parse a tokio_postgres error into a more specific DbError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{constraint}: {message}")),
                "23503" => return Self::ForeignKeyViolation(format!("{constraint}: {message}")),
                "23514" => return Self::CheckViolation(format!("{constraint}: {message}")),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for DbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
