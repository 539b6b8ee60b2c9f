//! Partial update payloads rendered as parameterized SET fragments.

use crate::error::{DbError, DbResult};
use crate::sql::param::{Null, Param, ParamList};
use crate::sql::{Fragment, quote_ident};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tokio_postgres::types::ToSql;

/// Map from caller-facing field names to database column names.
///
/// Fields without an entry fall back to their own name, so only renamed
/// columns need registering.
#[derive(Clone, Debug, Default)]
pub struct ColumnMap {
    entries: Vec<(String, String)>,
}

impl ColumnMap {
    /// Create an empty map (every field resolves to itself).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field-to-column rename.
    pub fn map(mut self, field: &str, column: &str) -> Self {
        self.entries.push((field.to_string(), column.to_string()));
        self
    }

    /// Resolve a field name to its column name.
    pub fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, c)| c.as_str())
            .unwrap_or(field)
    }
}

/// A sparse update payload: the fields a caller actually supplied, in the
/// order they supplied them.
///
/// Fields the caller omitted never appear here, so an update touches only
/// the columns the payload names. Setting the same field twice replaces
/// the earlier value in place.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    fields: Vec<(String, Param)>,
}

impl Patch {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value.
    pub fn set<T: ToSql + Send + Sync + 'static>(mut self, field: &str, value: T) -> Self {
        let param = Param::new(value);
        match self.fields.iter_mut().find(|(f, _)| f == field) {
            Some(slot) => slot.1 = param,
            None => self.fields.push((field.to_string(), param)),
        }
        self
    }

    /// Set an optional field value (None => skip).
    pub fn set_opt<T: ToSql + Send + Sync + 'static>(self, field: &str, value: Option<T>) -> Self {
        if let Some(v) = value {
            self.set(field, v)
        } else {
            self
        }
    }

    /// Number of fields in the payload.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the field names in payload order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(f, _)| f.as_str())
    }

    /// Build a payload from a JSON object, keeping the object's key order.
    ///
    /// Strings bind as text, booleans as BOOLEAN, integers as BIGINT and
    /// fractional numbers as NUMERIC. `null` binds as an untyped NULL so it
    /// clears columns of any type. Arrays and nested objects are rejected
    /// with [`DbError::InvalidField`].
    pub fn from_json(object: &Map<String, Value>) -> DbResult<Self> {
        let mut patch = Self::new();
        for (field, value) in object {
            patch = match value {
                Value::Null => patch.set(field, Null),
                Value::Bool(b) => patch.set(field, *b),
                Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        patch.set(field, i)
                    } else if let Some(d) = n.as_f64().and_then(|f| Decimal::try_from(f).ok()) {
                        patch.set(field, d)
                    } else {
                        return Err(DbError::invalid_field(field, "number is out of range"));
                    }
                }
                Value::String(s) => patch.set(field, s.clone()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(DbError::invalid_field(field, "expected a JSON scalar"));
                }
            };
        }
        Ok(patch)
    }

    /// Render the payload as a parameterized SET fragment.
    ///
    /// Produces `"col"=$1, "col2"=$2, ...` with one placeholder per field
    /// in payload order, resolving column names through `columns`. Returns
    /// [`DbError::NoData`] when the payload has no fields, so the caller
    /// never issues an UPDATE with an empty SET clause.
    pub fn set_clause(&self, columns: &ColumnMap) -> DbResult<Fragment> {
        if self.fields.is_empty() {
            return Err(DbError::NoData);
        }

        let mut params = ParamList::new();
        let mut parts = Vec::with_capacity(self.fields.len());
        for (field, param) in &self.fields {
            let idx = params.push_param(param.clone());
            parts.push(format!("{}=${idx}", quote_ident(columns.resolve(field))));
        }

        Ok(Fragment {
            sql: parts.join(", "),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_falls_back_to_field_name() {
        let columns = ColumnMap::new().map("firstName", "first_name");
        assert_eq!(columns.resolve("firstName"), "first_name");
        assert_eq!(columns.resolve("age"), "age");
    }

    #[test]
    fn set_replaces_duplicate_field_in_place() {
        let patch = Patch::new()
            .set("a", 1i64)
            .set("b", 2i64)
            .set("a", 3i64);
        assert_eq!(patch.len(), 2);
        assert_eq!(patch.fields().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn set_opt_skips_none() {
        let patch = Patch::new()
            .set_opt("a", Some(1i64))
            .set_opt("b", None::<i64>);
        assert_eq!(patch.fields().collect::<Vec<_>>(), ["a"]);
    }
}
