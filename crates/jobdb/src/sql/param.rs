//! Parameter storage using Arc for clone-friendly fragment builders.

use bytes::BytesMut;
use std::error::Error;
use std::sync::Arc;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A clone-friendly parameter wrapper using Arc.
///
/// Fragments hold their bound values by `Param` so a built query can be
/// cloned, retried, or inspected without copying the underlying values.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        // Arc<dyn ToSql + Send + Sync> -> &(dyn ToSql + Sync); the query
        // methods in tokio-postgres only ask for Sync.
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Param").field(&"<dyn ToSql>").finish()
    }
}

/// An untyped SQL NULL.
///
/// Plain `Option::<T>::None` only binds against columns whose type `T`
/// accepts. `Null` binds as NULL against any column, which is what a
/// dynamic payload needs when a caller clears a field without the payload
/// knowing the column's type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Null;

impl ToSql for Null {
    fn to_sql(
        &self,
        _ty: &Type,
        _out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        Ok(IsNull::Yes)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

/// A collection of parameters that can be built into references.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based index.
    pub fn push<T: ToSql + Send + Sync + 'static>(&mut self, value: T) -> usize {
        self.params.push(Param::new(value));
        self.params.len()
    }

    /// Add a pre-wrapped Param and return its 1-based index.
    pub fn push_param(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.as_sql()).collect()
    }
}
