//! Error types for polysql.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolysqlError {
    /// Database type key has no registered dialect and no override was supplied.
    #[error("Undefined dialect for database type '{db_type}'{hint}")]
    UndefinedDialect { db_type: String, hint: String },

    /// The active dialect has no rendering for the requested capability.
    #[error("{feature} is not supported by {dialect}")]
    UnsupportedFeature {
        dialect: &'static str,
        feature: String,
    },

    /// A generated identifier exceeds the dialect's length limit.
    #[error(
        "Alias '{identifier}' is longer than the {limit} characters allowed by {dialect}. \
         Set a shorter explicit alias for this member"
    )]
    NamingConstraintViolation {
        identifier: String,
        limit: usize,
        dialect: &'static str,
    },

    /// Internal contract violation: unallocated parameter marker,
    /// malformed member path, malformed interval. Never recovered.
    #[error("Programming error: {0}")]
    Programming(String),
}

impl PolysqlError {
    /// Create an undefined-dialect error, optionally with a suggestion.
    pub fn undefined_dialect(db_type: impl Into<String>, suggestion: Option<String>) -> Self {
        Self::UndefinedDialect {
            db_type: db_type.into(),
            hint: suggestion
                .map(|s| format!(". Did you mean '{}'?", s))
                .unwrap_or_default(),
        }
    }

    /// Create an unsupported-feature error for the given dialect.
    pub fn unsupported(dialect: &'static str, feature: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            dialect,
            feature: feature.into(),
        }
    }

    /// Create a programming error.
    pub fn programming(message: impl Into<String>) -> Self {
        Self::Programming(message.into())
    }
}

/// Result type alias for polysql operations.
pub type PolysqlResult<T> = Result<T, PolysqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PolysqlError::undefined_dialect("postgress", Some("postgres".to_string()));
        assert_eq!(
            err.to_string(),
            "Undefined dialect for database type 'postgress'. Did you mean 'postgres'?"
        );

        let err = PolysqlError::unsupported("mysql", "Approximate distinct count");
        assert_eq!(
            err.to_string(),
            "Approximate distinct count is not supported by mysql"
        );
    }
}
