use crate::dialect::sql::postgres::POSTGRES_TEMPLATES;
use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::SqlGenerator;
use crate::error::PolysqlResult;
use crate::params::PlaceholderStyle;

const CRATE_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("types.binary", "OBJECT"),
    TemplateOp::Delete("types.interval"),
];

/// CrateDB speaks the Postgres wire dialect but lacks the hll
/// extension, interval columns and timezone-aware casts.
#[derive(Debug)]
pub struct CrateGenerator {
    templates: TemplateSet,
}

impl CrateGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, POSTGRES_TEMPLATES, CRATE_TEMPLATES]),
        }
    }
}

impl Default for CrateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for CrateGenerator {
    fn name(&self) -> &'static str {
        "crate"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Dollar
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!("timezone('{}', {})", timezone, field))
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("{}::timestamp", value)
    }
}
