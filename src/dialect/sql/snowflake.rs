use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::SqlGenerator;
use crate::error::PolysqlResult;

const SNOWFLAKE_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("expressions.timestamp_literal", "'{{ value }}'::timestamp_tz"),
    TemplateOp::Set("types.string", "VARCHAR"),
    TemplateOp::Set("types.double", "DOUBLE"),
];

#[derive(Debug)]
pub struct SnowflakeGenerator {
    templates: TemplateSet,
}

impl SnowflakeGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, SNOWFLAKE_TEMPLATES]),
        }
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for SnowflakeGenerator {
    fn name(&self) -> &'static str {
        "snowflake"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(255)
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("{}::timestamp_tz", value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("{}::timestamp", value)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!("CONVERT_TIMEZONE('{}', {})", timezone, field))
    }

    fn hll_init(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("HLL_EXPORT(HLL_ACCUMULATE({}))", sql))
    }

    fn hll_merge(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("HLL_ESTIMATE(HLL_COMBINE(HLL_IMPORT({})))", sql))
    }

    fn count_distinct_approx(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("APPROX_COUNT_DISTINCT({})", sql))
    }
}
