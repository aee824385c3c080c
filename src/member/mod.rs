//! Semantic member AST: dimensions, segments, filters and boolean
//! filter groups, rendered polymorphically through the dialect contract.

pub mod context;
pub mod dimension;
pub mod filter;
pub mod group_filter;
pub mod segment;

pub use context::{MemberKind, MemberPath, QueryContext};
pub use dimension::Dimension;
pub use filter::{Filter, FilterOperator};
pub use group_filter::{FilterItem, GroupFilter, GroupMember, GroupOperator};
pub use segment::Segment;

use serde::{Deserialize, Serialize};

use crate::dialect::SqlGenerator;
use crate::error::PolysqlResult;

/// Where a member's SQL comes from: a path into the symbol table, or an
/// inline expression owned by a cube under a synthetic name. The two
/// are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberSource {
    Path(MemberPath),
    Expression {
        cube: String,
        name: String,
        sql: String,
    },
}

impl MemberSource {
    pub(crate) fn sql(&self, context: &dyn QueryContext) -> PolysqlResult<String> {
        match self {
            MemberSource::Path(path) => context.member_sql(path),
            MemberSource::Expression { cube, sql, .. } => context.inline_sql(cube, sql),
        }
    }

    /// Stable alias, derived from the path or the synthetic name.
    pub(crate) fn alias_name(&self) -> String {
        match self {
            MemberSource::Path(path) => {
                format!("{}__{}", underscore(&path.cube), underscore(&path.name))
            }
            MemberSource::Expression { cube, name, .. } => {
                format!("{}__{}", underscore(cube), underscore(name))
            }
        }
    }

    pub(crate) fn path(&self) -> Option<&MemberPath> {
        match self {
            MemberSource::Path(path) => Some(path),
            MemberSource::Expression { .. } => None,
        }
    }
}

/// A rendered projection entry. `needs_alias` is decided here, once:
/// when the alias equals the raw expression no `AS` clause is required,
/// and downstream code must not re-derive that from string equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectColumn {
    pub sql: String,
    pub alias: String,
    pub needs_alias: bool,
}

impl SelectColumn {
    pub(crate) fn new(sql: String, alias: String) -> Self {
        let needs_alias = sql != alias;
        Self {
            sql,
            alias,
            needs_alias,
        }
    }

    pub fn render(&self, dialect: &dyn SqlGenerator) -> String {
        if self.needs_alias {
            format!("{} {}", self.sql, dialect.escape_column_name(&self.alias))
        } else {
            self.sql.clone()
        }
    }
}

/// camelCase and PascalCase to snake_case, dots left to the caller.
pub(crate) fn underscore(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("createdAt"), "created_at");
        assert_eq!(underscore("Orders"), "orders");
        assert_eq!(underscore("visitor_checkins"), "visitor_checkins");
        assert_eq!(underscore("amountUSD2"), "amount_usd2");
    }
}
