use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::SqlGenerator;
use crate::error::PolysqlResult;

const VERTICA_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("types.string", "VARCHAR(65000)"),
    TemplateOp::Set("functions.STRING_AGG", "LISTAGG({{ args_concat }})"),
    TemplateOp::Set("types.binary", "VARBINARY"),
];

#[derive(Debug)]
pub struct VerticaGenerator {
    templates: TemplateSet,
}

impl VerticaGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, VERTICA_TEMPLATES]),
        }
    }
}

impl Default for VerticaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for VerticaGenerator {
    fn name(&self) -> &'static str {
        "vertica"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(128)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!("({} AT TIME ZONE '{}')", field, timezone))
    }

    fn count_distinct_approx(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("APPROXIMATE_COUNT_DISTINCT({})", sql))
    }
}
