use serde::{Deserialize, Serialize};

use crate::dialect::SqlGenerator;
use crate::error::PolysqlResult;

use super::context::{MemberPath, QueryContext};
use super::{MemberSource, SelectColumn};

/// A segment: a named boolean predicate from the model, or an inline
/// predicate expression owned by a cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    source: MemberSource,
}

impl Segment {
    pub fn from_path(path: &str) -> PolysqlResult<Segment> {
        Ok(Segment {
            source: MemberSource::Path(MemberPath::parse(path)?),
        })
    }

    pub fn from_expression(
        cube: impl Into<String>,
        name: impl Into<String>,
        sql: impl Into<String>,
    ) -> Segment {
        Segment {
            source: MemberSource::Expression {
                cube: cube.into(),
                name: name.into(),
                sql: sql.into(),
            },
        }
    }

    /// The segment's predicate SQL.
    pub fn sql(&self, context: &dyn QueryContext) -> PolysqlResult<String> {
        self.source.sql(context)
    }

    pub fn alias_name(&self) -> String {
        self.source.alias_name()
    }

    pub fn path(&self) -> Option<&MemberPath> {
        self.source.path()
    }

    /// The predicate contributed to a WHERE clause; an empty rendering
    /// contributes nothing.
    pub fn filter_to_where(&self, context: &dyn QueryContext) -> PolysqlResult<Option<String>> {
        let sql = self.sql(context)?;
        if sql.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(sql))
        }
    }

    /// Projection entry. Most backends forbid bare booleans in SELECT
    /// lists, so the expression goes through the dialect's segment wrap.
    pub fn select_column(
        &self,
        context: &dyn QueryContext,
        dialect: &dyn SqlGenerator,
    ) -> PolysqlResult<SelectColumn> {
        let sql = dialect.wrap_segment_for_dimension_select(&self.sql(context)?);
        let alias = dialect.checked_alias(&self.alias_name())?;
        Ok(SelectColumn::new(sql, alias))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dialect::sql::{MysqlGenerator, PostgresGenerator};
    use crate::member::testing::FixtureContext;

    #[test]
    fn test_select_column_coerces_booleans() {
        let segment = Segment::from_path("users.sfUsers").unwrap();

        let mysql = MysqlGenerator::new();
        let column = segment.select_column(&FixtureContext, &mysql).unwrap();
        assert_eq!(column.sql, "IF(\"users\".sfUsers, 1, 0)");
        assert_eq!(column.alias, "users__sf_users");
        assert!(column.needs_alias);
        assert_eq!(
            column.render(&mysql),
            "IF(\"users\".sfUsers, 1, 0) `users__sf_users`"
        );

        // postgres keeps the bare boolean
        let column = segment
            .select_column(&FixtureContext, &PostgresGenerator::new())
            .unwrap();
        assert_eq!(column.sql, "\"users\".sfUsers");
    }

    #[test]
    fn test_empty_predicate_contributes_nothing() {
        let segment = Segment::from_expression("users", "none", "  ");
        assert_eq!(segment.filter_to_where(&FixtureContext).unwrap(), None);
    }
}
