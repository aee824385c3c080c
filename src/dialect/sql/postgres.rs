use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::SqlGenerator;
use crate::error::PolysqlResult;
use crate::params::PlaceholderStyle;

/// Template layer shared by the whole Postgres wire family
/// (postgres, materialize, redshift, vertica, crate).
pub const POSTGRES_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("params.param", "${{ param_index + 1 }}"),
    TemplateOp::Set("types.double", "DOUBLE PRECISION"),
];

/// Postgres. Also serves the `materialize` registry key: Materialize
/// speaks the Postgres dialect for everything this crate renders.
#[derive(Debug)]
pub struct PostgresGenerator {
    templates: TemplateSet,
}

impl PostgresGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, POSTGRES_TEMPLATES]),
        }
    }
}

impl Default for PostgresGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for PostgresGenerator {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Dollar
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(63)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!("({}::timestamptz AT TIME ZONE '{}')", field, timezone))
    }

    // Approximate distinct counts need the hll extension installed.
    fn hll_init(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("hll_add_agg(hll_hash_any({}))", sql))
    }

    fn hll_merge(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("round(hll_cardinality(hll_union_agg({})))", sql))
    }

    fn count_distinct_approx(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!(
            "round(hll_cardinality(hll_add_agg(hll_hash_any({}))))",
            sql
        ))
    }
}
