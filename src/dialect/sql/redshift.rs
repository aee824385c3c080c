use crate::dialect::sql::postgres::POSTGRES_TEMPLATES;
use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::SqlGenerator;
use crate::error::PolysqlResult;
use crate::params::PlaceholderStyle;

const REDSHIFT_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("types.string", "VARCHAR(MAX)"),
    TemplateOp::Set("types.binary", "VARBYTE"),
    TemplateOp::Set("functions.STRING_AGG", "LISTAGG({{ args_concat }})"),
];

#[derive(Debug)]
pub struct RedshiftGenerator {
    templates: TemplateSet,
}

impl RedshiftGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[
                BASE_TEMPLATES,
                POSTGRES_TEMPLATES,
                REDSHIFT_TEMPLATES,
            ]),
        }
    }
}

impl Default for RedshiftGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for RedshiftGenerator {
    fn name(&self) -> &'static str {
        "redshift"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Dollar
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(127)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!("CONVERT_TIMEZONE('{}', {})", timezone, field))
    }

    // Redshift exposes an approximate aggregate but no reusable sketch
    // type, so hll_init/hll_merge stay unsupported.
    fn count_distinct_approx(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("approximate count(distinct {})", sql))
    }
}
