//! Ordered optional filters composed into a WHERE clause.

use crate::error::{DbError, DbResult};
use crate::sql::param::{Param, ParamList};
use crate::sql::Fragment;
use std::str::FromStr;
use tokio_postgres::types::ToSql;

/// One optional predicate: a comparison template plus its activation rule.
///
/// The template is trusted SQL carrying exactly one `?` slot, replaced at
/// build time with the filter's positional placeholder. Raw caller input
/// only ever becomes a bound value, never SQL text.
#[derive(Clone, Debug)]
pub struct Filter {
    name: String,
    template: String,
    rule: Rule,
}

#[derive(Clone, Debug)]
enum Rule {
    /// Bind the raw text as given.
    Text(Option<String>),
    /// Bind a strictly parsed value; `Err` keeps raw text that did not parse.
    Number(Option<Result<Param, String>>),
    /// Bind a fixed value, armed only by an exact raw literal.
    Flag { armed: bool, bind: Param },
}

impl Filter {
    /// Substring filter: active whenever raw text is present, binding it verbatim.
    pub fn text(name: &str, template: &str, raw: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            template: template.to_string(),
            rule: Rule::Text(raw.map(str::to_string)),
        }
    }

    /// Threshold filter: active when raw text is present and parses as `T`.
    ///
    /// Present text that does not parse is not dropped; it surfaces as
    /// [`DbError::InvalidFilter`] when the query is built. Surrounding
    /// whitespace is tolerated, an empty string is not.
    pub fn number<T>(name: &str, template: &str, raw: Option<&str>) -> Self
    where
        T: FromStr + ToSql + Send + Sync + 'static,
    {
        let value = raw.map(|text| match text.trim().parse::<T>() {
            Ok(v) => Ok(Param::new(v)),
            Err(_) => Err(text.to_string()),
        });
        Self {
            name: name.to_string(),
            template: template.to_string(),
            rule: Rule::Number(value),
        }
    }

    /// Flag filter: active only when the raw text is exactly `"true"`,
    /// binding the fixed `bind` value. Any other text, including `"false"`
    /// and mixed case, leaves the filter inactive.
    pub fn flag<T>(name: &str, template: &str, raw: Option<&str>, bind: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            template: template.to_string(),
            rule: Rule::Flag {
                armed: raw == Some("true"),
                bind: Param::new(bind),
            },
        }
    }

    /// The caller-facing filter name, as used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value this filter binds, or None when inactive.
    fn value(&self) -> DbResult<Option<Param>> {
        match &self.rule {
            Rule::Text(raw) => Ok(raw.clone().map(Param::new)),
            Rule::Number(None) => Ok(None),
            Rule::Number(Some(Ok(param))) => Ok(Some(param.clone())),
            Rule::Number(Some(Err(raw))) => Err(DbError::invalid_filter(&self.name, raw)),
            Rule::Flag { armed: false, .. } => Ok(None),
            Rule::Flag { armed: true, bind } => Ok(Some(bind.clone())),
        }
    }
}

/// Builds `base [WHERE preds] [ORDER BY key]` from a base SELECT and a
/// declared sequence of optional filters.
///
/// Filters contribute predicates in declaration order. Inactive filters
/// leave no trace in the SQL or the parameter list, so placeholders stay
/// dense and 1-based over the active filters alone. With no active filter
/// the base statement is returned verbatim.
#[derive(Clone, Debug)]
pub struct SearchQb {
    base: String,
    filters: Vec<Filter>,
    order_by: Option<String>,
}

impl SearchQb {
    /// Create a builder over a base SELECT statement.
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_string(),
            filters: Vec::new(),
            order_by: None,
        }
    }

    /// Append a filter. Declaration order fixes predicate order.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append a case-insensitive substring filter on `column`.
    ///
    /// The wildcards live in the SQL template (`'%'||$n||'%'`) and the raw
    /// text is bound as a value, so it can widen the match pattern but
    /// never escape into the statement itself.
    pub fn contains(self, name: &str, column: &str, raw: Option<&str>) -> Self {
        let template = format!("{column} ILIKE '%'||?||'%'");
        self.filter(Filter::text(name, &template, raw))
    }

    /// Append a lower-bound filter on `column`.
    pub fn at_least<T>(self, name: &str, column: &str, raw: Option<&str>) -> Self
    where
        T: FromStr + ToSql + Send + Sync + 'static,
    {
        let template = format!("{column} >= ?");
        self.filter(Filter::number::<T>(name, &template, raw))
    }

    /// Append an upper-bound filter on `column`.
    pub fn at_most<T>(self, name: &str, column: &str, raw: Option<&str>) -> Self
    where
        T: FromStr + ToSql + Send + Sync + 'static,
    {
        let template = format!("{column} <= ?");
        self.filter(Filter::number::<T>(name, &template, raw))
    }

    /// Append a flag filter with a custom template and fixed bound value.
    pub fn flag<T>(self, name: &str, template: &str, raw: Option<&str>, bind: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.filter(Filter::flag(name, template, raw, bind))
    }

    /// Set the ORDER BY key appended when at least one filter is active.
    pub fn order_by(mut self, clause: &str) -> Self {
        self.order_by = Some(clause.to_string());
        self
    }

    /// Render the final statement and its bound values.
    ///
    /// Active predicates are joined with ` AND ` behind a single ` WHERE `,
    /// numbered `$1..$n` in declaration order, then the ORDER BY key (if
    /// set) is appended. A filter holding unparseable raw text fails the
    /// whole build with [`DbError::InvalidFilter`].
    pub fn build(&self) -> DbResult<Fragment> {
        let mut params = ParamList::new();
        let mut predicates = Vec::new();

        for filter in &self.filters {
            if let Some(param) = filter.value()? {
                let idx = params.push_param(param);
                predicates.push(filter.template.replacen('?', &format!("${idx}"), 1));
            }
        }

        let mut sql = self.base.clone();
        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
            if let Some(order) = &self.order_by {
                sql.push_str(" ORDER BY ");
                sql.push_str(order);
            }
        }

        Ok(Fragment { sql, params })
    }
}
