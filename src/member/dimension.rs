use serde::{Deserialize, Serialize};

use crate::dialect::SqlGenerator;
use crate::error::PolysqlResult;

use super::context::{MemberPath, QueryContext};
use super::{MemberSource, SelectColumn};

/// A dimension: a path into the symbol table, or an inline expression
/// pushed down with its owning cube and a synthetic name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    source: MemberSource,
}

impl Dimension {
    pub fn from_path(path: &str) -> PolysqlResult<Dimension> {
        Ok(Dimension {
            source: MemberSource::Path(MemberPath::parse(path)?),
        })
    }

    pub fn from_expression(
        cube: impl Into<String>,
        name: impl Into<String>,
        sql: impl Into<String>,
    ) -> Dimension {
        Dimension {
            source: MemberSource::Expression {
                cube: cube.into(),
                name: name.into(),
                sql: sql.into(),
            },
        }
    }

    /// The join-alias-qualified expression for this dimension.
    pub fn sql(&self, context: &dyn QueryContext) -> PolysqlResult<String> {
        self.source.sql(context)
    }

    pub fn alias_name(&self) -> String {
        self.source.alias_name()
    }

    pub fn path(&self) -> Option<&MemberPath> {
        self.source.path()
    }

    /// Projection entry with the dialect-checked alias.
    pub fn select_column(
        &self,
        context: &dyn QueryContext,
        dialect: &dyn SqlGenerator,
    ) -> PolysqlResult<SelectColumn> {
        let sql = self.sql(context)?;
        let alias = dialect.checked_alias(&self.alias_name())?;
        Ok(SelectColumn::new(sql, alias))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_from_path() {
        let dimension = Dimension::from_path("orders.createdAt").unwrap();
        assert_eq!(dimension.alias_name(), "orders__created_at");
    }

    #[test]
    fn test_alias_from_expression() {
        let dimension = Dimension::from_expression("orders", "revenueTier", "CASE WHEN 1 END");
        assert_eq!(dimension.alias_name(), "orders__revenue_tier");
        assert!(dimension.path().is_none());
    }

    #[test]
    fn test_select_column_skips_redundant_alias() {
        use crate::dialect::sql::PostgresGenerator;
        use crate::member::testing::FixtureContext;

        let pg = PostgresGenerator::new();

        let dimension = Dimension::from_path("orders.createdAt").unwrap();
        let column = dimension.select_column(&FixtureContext, &pg).unwrap();
        assert!(column.needs_alias);
        assert_eq!(
            column.render(&pg),
            "\"orders\".createdAt \"orders__created_at\""
        );

        // expression that already renders as its own alias
        let dimension = Dimension::from_expression("orders", "raw", "orders__raw");
        let column = dimension.select_column(&FixtureContext, &pg).unwrap();
        assert!(!column.needs_alias);
        assert_eq!(column.render(&pg), "orders__raw");
    }
}
