//! SQL fragment builders with positional parameter binding.
//!
//! Two builders cover the dynamic halves of the CRUD surface:
//!
//! - [`Patch`] renders a sparse update payload as a parameterized SET
//!   fragment, one `$n` placeholder per supplied field.
//! - [`SearchQb`] renders a base SELECT plus a declared sequence of
//!   optional filters as a WHERE clause, numbering only the filters a
//!   caller actually activated.
//!
//! Both keep caller data out of the SQL text entirely: values travel as
//! bound parameters, so the rendered statements are safe to hand to
//! tokio-postgres as-is.

pub mod filter;
pub mod param;
pub mod update;

#[cfg(test)]
mod tests;

pub use filter::{Filter, SearchQb};
pub use param::{Null, Param, ParamList};
pub use update::{ColumnMap, Patch};

use tokio_postgres::types::ToSql;

/// A rendered SQL fragment paired with the values its placeholders bind.
#[derive(Clone, Debug, Default)]
pub struct Fragment {
    /// SQL text with `$1..$n` placeholders.
    pub sql: String,
    /// Bound values in placeholder order.
    pub params: ParamList,
}

impl Fragment {
    /// Get the bound values as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.as_refs()
    }
}

/// Quote a name as a PostgreSQL identifier.
///
/// Wraps the name in double quotes and escapes embedded quotes as `""`,
/// so arbitrary field names cannot break out of identifier position.
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
            out.push('"');
        } else {
            out.push(ch);
        }
    }
    out.push('"');
    out
}
