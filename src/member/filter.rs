use serde::{Deserialize, Serialize};

use crate::dialect::{MatchType, SqlGenerator};
use crate::error::{PolysqlError, PolysqlResult};
use crate::params::ParamAllocator;

use super::context::{MemberPath, QueryContext};

/// Filter operators over a single member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    Set,
    NotSet,
    InDateRange,
    NotInDateRange,
    BeforeDate,
    AfterDate,
}

/// A simple filter: one member, one operator, a value list. A `None`
/// value stands for SQL NULL and steers the `IS NULL` handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub member: MemberPath,
    pub operator: FilterOperator,
    pub values: Vec<Option<String>>,
}

impl Filter {
    pub fn new(
        member: &str,
        operator: FilterOperator,
        values: Vec<Option<String>>,
    ) -> PolysqlResult<Filter> {
        Ok(Filter {
            member: MemberPath::parse(member)?,
            operator,
            values,
        })
    }

    /// Render the predicate, allocating parameters as markers. Returns
    /// `None` when the filter has nothing to say (no usable values), so
    /// the enclosing group can drop it.
    pub fn to_where(
        &self,
        context: &dyn QueryContext,
        dialect: &dyn SqlGenerator,
        params: &mut ParamAllocator,
    ) -> PolysqlResult<Option<String>> {
        let column = context.member_sql(&self.member)?;
        match self.operator {
            FilterOperator::Equals => Ok(self.equals_where(&column, false, params)),
            FilterOperator::NotEquals => Ok(self.equals_where(&column, true, params)),
            FilterOperator::Contains => Ok(self.like_or(&column, false, MatchType::Contains, dialect, params)),
            FilterOperator::NotContains => Ok(self.like_or(&column, true, MatchType::Contains, dialect, params)),
            FilterOperator::StartsWith => Ok(self.like_or(&column, false, MatchType::Starts, dialect, params)),
            FilterOperator::NotStartsWith => Ok(self.like_or(&column, true, MatchType::Starts, dialect, params)),
            FilterOperator::EndsWith => Ok(self.like_or(&column, false, MatchType::Ends, dialect, params)),
            FilterOperator::NotEndsWith => Ok(self.like_or(&column, true, MatchType::Ends, dialect, params)),
            FilterOperator::Gt => self.comparison_where(&column, ">", params),
            FilterOperator::Gte => self.comparison_where(&column, ">=", params),
            FilterOperator::Lt => self.comparison_where(&column, "<", params),
            FilterOperator::Lte => self.comparison_where(&column, "<=", params),
            FilterOperator::Set => Ok(Some(format!("{} IS NOT NULL", column))),
            FilterOperator::NotSet => Ok(Some(format!("{} IS NULL", column))),
            FilterOperator::InDateRange => {
                Ok(self.date_range_where(&column, false, dialect, params))
            }
            FilterOperator::NotInDateRange => {
                Ok(self.date_range_where(&column, true, dialect, params))
            }
            FilterOperator::BeforeDate => Ok(self
                .single_date_param(dialect, params)
                .map(|param| dialect.before_date_filter(&column, &param))),
            FilterOperator::AfterDate => Ok(self
                .single_date_param(dialect, params)
                .map(|param| dialect.after_date_filter(&column, &param))),
        }
    }

    /// Non-null values, in order.
    fn filter_params(&self) -> Vec<&str> {
        self.values
            .iter()
            .filter_map(|value| value.as_deref())
            .collect()
    }

    fn values_contain_null(&self) -> bool {
        self.values.iter().any(Option::is_none)
    }

    /// ` OR col IS NULL` when nulls should match (or, negated, when
    /// they should not be excluded).
    fn or_is_null_check(&self, column: &str, negate: bool) -> String {
        let add = if negate {
            !self.values_contain_null()
        } else {
            self.values_contain_null()
        };
        if add {
            format!(" OR {} IS NULL", column)
        } else {
            String::new()
        }
    }

    fn equals_where(
        &self,
        column: &str,
        negate: bool,
        params: &mut ParamAllocator,
    ) -> Option<String> {
        let filter_params = self.filter_params();
        if filter_params.is_empty() {
            if !self.values_contain_null() {
                return None;
            }
            // the only value is NULL
            return Some(if negate {
                format!("{} IS NOT NULL", column)
            } else {
                format!("{} IS NULL", column)
            });
        }

        if filter_params.len() > 1 {
            let markers: Vec<String> = filter_params
                .iter()
                .map(|value| params.allocate_param(*value))
                .collect();
            let operator = if negate { "NOT IN" } else { "IN" };
            return Some(format!(
                "{} {} ({}){}",
                column,
                operator,
                markers.join(", "),
                self.or_is_null_check(column, negate)
            ));
        }

        let marker = params.allocate_param(filter_params[0]);
        let operator = if negate { "<>" } else { "=" };
        Some(format!(
            "{} {} {}{}",
            column,
            operator,
            marker,
            self.or_is_null_check(column, negate)
        ))
    }

    /// Case-insensitive pattern matches, one per value, OR-joined
    /// (AND-joined when negated), with the null check appended.
    fn like_or(
        &self,
        column: &str,
        negate: bool,
        match_type: MatchType,
        dialect: &dyn SqlGenerator,
        params: &mut ParamAllocator,
    ) -> Option<String> {
        let filter_params = self.filter_params();
        if filter_params.is_empty() {
            return None;
        }
        let joiner = if negate { " AND " } else { " OR " };
        let likes: Vec<String> = filter_params
            .iter()
            .map(|value| {
                let marker = params.allocate_param(*value);
                dialect.like_ignore_case(column, negate, &marker, match_type)
            })
            .collect();
        Some(format!(
            "{}{}",
            likes.join(joiner),
            self.or_is_null_check(column, negate)
        ))
    }

    fn comparison_where(
        &self,
        column: &str,
        operator: &str,
        params: &mut ParamAllocator,
    ) -> PolysqlResult<Option<String>> {
        let filter_params = self.filter_params();
        let first = filter_params.first().ok_or_else(|| {
            PolysqlError::programming(format!(
                "Expected one parameter for '{}' filter but nothing found",
                self.member
            ))
        })?;
        let marker = params.allocate_param(*first);
        Ok(Some(format!("{} {} {}", column, operator, marker)))
    }

    fn date_range_where(
        &self,
        column: &str,
        negate: bool,
        dialect: &dyn SqlGenerator,
        params: &mut ParamAllocator,
    ) -> Option<String> {
        let filter_params = self.filter_params();
        if filter_params.len() < 2 {
            return None;
        }
        let from = dialect.time_stamp_cast(&params.allocate_param(filter_params[0]));
        let to = dialect.time_stamp_cast(&params.allocate_param(filter_params[1]));
        Some(if negate {
            dialect.time_not_in_range_filter(column, &from, &to)
        } else {
            dialect.time_range_filter(column, &from, &to)
        })
    }

    fn single_date_param(
        &self,
        dialect: &dyn SqlGenerator,
        params: &mut ParamAllocator,
    ) -> Option<String> {
        self.filter_params()
            .first()
            .map(|value| dialect.time_stamp_cast(&params.allocate_param(*value)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dialect::sql::{MysqlGenerator, PostgresGenerator};
    use crate::member::testing::FixtureContext;

    fn where_sql(
        filter: &Filter,
        dialect: &dyn SqlGenerator,
        params: &mut ParamAllocator,
    ) -> Option<String> {
        filter.to_where(&FixtureContext, dialect, params).unwrap()
    }

    fn values(items: &[&str]) -> Vec<Option<String>> {
        items.iter().map(|v| Some((*v).to_string())).collect()
    }

    #[test]
    fn test_equals_and_not_equals() {
        let pg = PostgresGenerator::new();
        let mut params = ParamAllocator::new();

        let filter =
            Filter::new("orders.status", FilterOperator::Equals, values(&["completed"])).unwrap();
        assert_eq!(
            where_sql(&filter, &pg, &mut params).unwrap(),
            "\"orders\".status = $0$"
        );

        let filter = Filter::new(
            "orders.status",
            FilterOperator::Equals,
            values(&["completed", "shipped"]),
        )
        .unwrap();
        assert_eq!(
            where_sql(&filter, &pg, &mut params).unwrap(),
            "\"orders\".status IN ($1$, $2$)"
        );

        // NULL <> 'x' is NULL in SQL, so negation keeps null rows
        let filter = Filter::new(
            "orders.status",
            FilterOperator::NotEquals,
            values(&["completed"]),
        )
        .unwrap();
        assert_eq!(
            where_sql(&filter, &pg, &mut params).unwrap(),
            "\"orders\".status <> $3$ OR \"orders\".status IS NULL"
        );
    }

    #[test]
    fn test_null_values() {
        let pg = PostgresGenerator::new();
        let mut params = ParamAllocator::new();

        let filter = Filter::new("orders.status", FilterOperator::Equals, vec![None]).unwrap();
        assert_eq!(
            where_sql(&filter, &pg, &mut params).unwrap(),
            "\"orders\".status IS NULL"
        );

        let filter = Filter::new("orders.status", FilterOperator::NotEquals, vec![None]).unwrap();
        assert_eq!(
            where_sql(&filter, &pg, &mut params).unwrap(),
            "\"orders\".status IS NOT NULL"
        );

        let filter = Filter::new(
            "orders.status",
            FilterOperator::Equals,
            vec![Some("completed".to_string()), None],
        )
        .unwrap();
        assert_eq!(
            where_sql(&filter, &pg, &mut params).unwrap(),
            "\"orders\".status = $0$ OR \"orders\".status IS NULL"
        );

        let filter = Filter::new("orders.status", FilterOperator::Equals, vec![]).unwrap();
        assert_eq!(where_sql(&filter, &pg, &mut params), None);
    }

    #[test]
    fn test_set_operators() {
        let pg = PostgresGenerator::new();
        let mut params = ParamAllocator::new();

        let filter = Filter::new("orders.status", FilterOperator::Set, vec![]).unwrap();
        assert_eq!(
            where_sql(&filter, &pg, &mut params).unwrap(),
            "\"orders\".status IS NOT NULL"
        );

        let filter = Filter::new("orders.status", FilterOperator::NotSet, vec![]).unwrap();
        assert_eq!(
            where_sql(&filter, &pg, &mut params).unwrap(),
            "\"orders\".status IS NULL"
        );
        assert!(params.params().is_empty());
    }

    #[test]
    fn test_like_operators() {
        let mysql = MysqlGenerator::new();
        let mut params = ParamAllocator::new();

        let filter = Filter::new(
            "users.name",
            FilterOperator::Contains,
            values(&["bob", "alice"]),
        )
        .unwrap();
        assert_eq!(
            where_sql(&filter, &mysql, &mut params).unwrap(),
            "LOWER(\"users\".name) LIKE CONCAT('%', LOWER($0$), '%') OR \
             LOWER(\"users\".name) LIKE CONCAT('%', LOWER($1$), '%')"
        );

        let filter = Filter::new(
            "users.name",
            FilterOperator::NotStartsWith,
            values(&["bob", "alice"]),
        )
        .unwrap();
        assert_eq!(
            where_sql(&filter, &mysql, &mut params).unwrap(),
            "LOWER(\"users\".name) NOT LIKE CONCAT(LOWER($2$), '%') AND \
             LOWER(\"users\".name) NOT LIKE CONCAT(LOWER($3$), '%')"
        );
    }

    #[test]
    fn test_comparison_requires_a_value() {
        let pg = PostgresGenerator::new();
        let mut params = ParamAllocator::new();

        let filter = Filter::new("orders.amount", FilterOperator::Gt, values(&["100"])).unwrap();
        assert_eq!(
            where_sql(&filter, &pg, &mut params).unwrap(),
            "\"orders\".amount > $0$"
        );

        let filter = Filter::new("orders.amount", FilterOperator::Gt, vec![]).unwrap();
        let err = filter
            .to_where(&FixtureContext, &pg, &mut params)
            .unwrap_err();
        assert!(matches!(err, PolysqlError::Programming(_)));
    }

    #[test]
    fn test_date_operators() {
        let pg = PostgresGenerator::new();
        let mut params = ParamAllocator::new();

        let filter = Filter::new(
            "orders.created_at",
            FilterOperator::InDateRange,
            values(&["2020-01-01", "2020-12-31"]),
        )
        .unwrap();
        assert_eq!(
            where_sql(&filter, &pg, &mut params).unwrap(),
            "\"orders\".created_at >= $0$::timestamptz AND \"orders\".created_at <= $1$::timestamptz"
        );

        let filter = Filter::new(
            "orders.created_at",
            FilterOperator::BeforeDate,
            values(&["2020-01-01"]),
        )
        .unwrap();
        assert_eq!(
            where_sql(&filter, &pg, &mut params).unwrap(),
            "\"orders\".created_at < $2$::timestamptz"
        );

        // a half-open range has nothing to render
        let filter = Filter::new(
            "orders.created_at",
            FilterOperator::InDateRange,
            values(&["2020-01-01"]),
        )
        .unwrap();
        assert_eq!(where_sql(&filter, &pg, &mut params), None);
    }
}
