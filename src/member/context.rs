use serde::{Deserialize, Serialize};

use crate::error::{PolysqlError, PolysqlResult};

/// A dotted reference into the external symbol table, `cube.member`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberPath {
    pub cube: String,
    pub name: String,
}

impl MemberPath {
    pub fn parse(path: &str) -> PolysqlResult<MemberPath> {
        let mut parts = path.split('.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(cube), Some(name), None) if !cube.is_empty() && !name.is_empty() => {
                Ok(MemberPath {
                    cube: cube.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(PolysqlError::programming(format!(
                "Malformed member path: '{}'",
                path
            ))),
        }
    }
}

impl std::fmt::Display for MemberPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.cube, self.name)
    }
}

/// What a path resolves to in the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Dimension,
    Measure,
    Segment,
}

/// The narrow interface members render through: the symbol table plus
/// the enclosing query plan's join-alias context.
pub trait QueryContext {
    /// Join-alias-qualified SQL expression for a model member.
    fn member_sql(&self, path: &MemberPath) -> PolysqlResult<String>;

    /// Evaluate an inline expression within `cube`'s column namespace.
    fn inline_sql(&self, cube: &str, expression: &str) -> PolysqlResult<String>;

    /// Symbol-table kind of a member.
    fn member_kind(&self, path: &MemberPath) -> PolysqlResult<MemberKind>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path() {
        let path = MemberPath::parse("orders.status").unwrap();
        assert_eq!(path.cube, "orders");
        assert_eq!(path.name, "status");
        assert_eq!(path.to_string(), "orders.status");
    }

    #[test]
    fn test_malformed_paths() {
        assert!(MemberPath::parse("orders").is_err());
        assert!(MemberPath::parse("orders.").is_err());
        assert!(MemberPath::parse(".status").is_err());
        assert!(MemberPath::parse("a.b.c").is_err());
    }
}
