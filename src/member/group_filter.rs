use serde::{Deserialize, Serialize};

use crate::dialect::SqlGenerator;
use crate::error::{PolysqlError, PolysqlResult};
use crate::params::ParamAllocator;

use super::context::QueryContext;
use super::filter::Filter;
use super::segment::Segment;

/// Boolean connective of a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupOperator {
    And,
    Or,
}

impl GroupOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupOperator::And => "AND",
            GroupOperator::Or => "OR",
        }
    }
}

impl std::str::FromStr for GroupOperator {
    type Err = PolysqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(GroupOperator::And),
            "or" => Ok(GroupOperator::Or),
            other => Err(PolysqlError::programming(format!(
                "Unknown group operator: '{}'",
                other
            ))),
        }
    }
}

/// One child of a filter group: a simple filter, a segment, or a nested
/// group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterItem {
    Filter(Filter),
    Segment(Segment),
    Group(GroupFilter),
}

/// A leaf of the flattened filter tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupMember<'a> {
    Filter(&'a Filter),
    Segment(&'a Segment),
}

/// A boolean tree of predicates. Children that render no predicate are
/// dropped; a group whose children all drop contributes no predicate at
/// all rather than a vacuous TRUE or FALSE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupFilter {
    pub operator: GroupOperator,
    pub children: Vec<FilterItem>,
}

impl GroupFilter {
    pub fn new(operator: GroupOperator, children: Vec<FilterItem>) -> GroupFilter {
        GroupFilter { operator, children }
    }

    /// Render the group: each surviving child parenthesized and joined
    /// with the upper-cased operator.
    pub fn to_where(
        &self,
        context: &dyn QueryContext,
        dialect: &dyn SqlGenerator,
        params: &mut ParamAllocator,
    ) -> PolysqlResult<Option<String>> {
        let mut rendered = Vec::new();
        for child in &self.children {
            let predicate = match child {
                FilterItem::Filter(filter) => filter.to_where(context, dialect, params)?,
                FilterItem::Segment(segment) => segment.filter_to_where(context)?,
                FilterItem::Group(group) => group.to_where(context, dialect, params)?,
            };
            if let Some(sql) = predicate {
                rendered.push(format!("({})", sql));
            }
        }
        if rendered.is_empty() {
            Ok(None)
        } else {
            Ok(Some(
                rendered.join(&format!(" {} ", self.operator.as_str())),
            ))
        }
    }

    /// Flatten the tree to its leaves; a nested group contributes its
    /// own flattened members, never itself.
    pub fn members(&self) -> Vec<GroupMember<'_>> {
        let mut members = Vec::new();
        for child in &self.children {
            match child {
                FilterItem::Filter(filter) => members.push(GroupMember::Filter(filter)),
                FilterItem::Segment(segment) => members.push(GroupMember::Segment(segment)),
                FilterItem::Group(group) => members.extend(group.members()),
            }
        }
        members
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dialect::sql::PostgresGenerator;
    use crate::member::filter::FilterOperator;
    use crate::member::testing::FixtureContext;

    fn equals(member: &str, values: &[&str]) -> FilterItem {
        FilterItem::Filter(
            Filter::new(
                member,
                FilterOperator::Equals,
                values.iter().map(|v| Some((*v).to_string())).collect(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_or_group_drops_empty_children() {
        let group = GroupFilter::new(
            GroupOperator::Or,
            vec![
                equals("orders.status", &["completed"]),
                equals("orders.status", &[]),
                equals("orders.status", &["pending"]),
            ],
        );
        let mut params = ParamAllocator::new();
        let sql = group
            .to_where(&FixtureContext, &PostgresGenerator::new(), &mut params)
            .unwrap()
            .unwrap();
        assert_eq!(sql, "(\"orders\".status = $0$) OR (\"orders\".status = $1$)");
        assert_eq!(params.params().len(), 2);
    }

    #[test]
    fn test_group_with_all_children_dropped_renders_nothing() {
        let group = GroupFilter::new(
            GroupOperator::And,
            vec![
                equals("orders.status", &[]),
                FilterItem::Group(GroupFilter::new(
                    GroupOperator::Or,
                    vec![equals("orders.city", &[])],
                )),
            ],
        );
        let mut params = ParamAllocator::new();
        let rendered = group
            .to_where(&FixtureContext, &PostgresGenerator::new(), &mut params)
            .unwrap();
        assert_eq!(rendered, None);
        assert!(params.params().is_empty());
    }

    #[test]
    fn test_nested_groups_parenthesize() {
        let inner = GroupFilter::new(
            GroupOperator::Or,
            vec![equals("orders.city", &["SF"]), equals("orders.city", &["NY"])],
        );
        let group = GroupFilter::new(
            GroupOperator::And,
            vec![
                equals("orders.status", &["completed"]),
                FilterItem::Group(inner),
            ],
        );
        let mut params = ParamAllocator::new();
        let sql = group
            .to_where(&FixtureContext, &PostgresGenerator::new(), &mut params)
            .unwrap()
            .unwrap();
        assert_eq!(
            sql,
            "(\"orders\".status = $0$) AND ((\"orders\".city = $1$) OR (\"orders\".city = $2$))"
        );
    }

    #[test]
    fn test_segment_child_contributes_predicate() {
        let group = GroupFilter::new(
            GroupOperator::Or,
            vec![FilterItem::Segment(Segment::from_expression(
                "users",
                "active",
                "\"users\".is_active = 1",
            ))],
        );
        let mut params = ParamAllocator::new();
        let sql = group
            .to_where(&FixtureContext, &PostgresGenerator::new(), &mut params)
            .unwrap()
            .unwrap();
        assert_eq!(sql, "(\"users\".is_active = 1)");
    }

    #[test]
    fn test_members_flattens_nested_groups() {
        let inner = GroupFilter::new(
            GroupOperator::Or,
            vec![
                equals("orders.city", &["SF"]),
                FilterItem::Segment(Segment::from_path("users.active").unwrap()),
            ],
        );
        let group = GroupFilter::new(
            GroupOperator::And,
            vec![
                equals("orders.status", &["completed"]),
                FilterItem::Group(inner),
            ],
        );
        let names: Vec<String> = group
            .members()
            .iter()
            .map(|member| match member {
                GroupMember::Filter(filter) => filter.member.to_string(),
                GroupMember::Segment(segment) => segment.alias_name(),
            })
            .collect();
        assert_eq!(names, vec!["orders.status", "orders.city", "users__active"]);
    }
}
