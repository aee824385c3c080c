use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::{MatchType, SqlGenerator};
use crate::error::{PolysqlError, PolysqlResult};
use crate::time::{Granularity, SqlInterval};

const SQLITE_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("types.string", "TEXT"),
    TemplateOp::Set("types.boolean", "INTEGER"),
    TemplateOp::Set("types.timestamp", "TEXT"),
    TemplateOp::Set("types.double", "REAL"),
    TemplateOp::Set("types.binary", "BLOB"),
    TemplateOp::Set("functions.STRING_AGG", "GROUP_CONCAT({{ args_concat }})"),
    TemplateOp::Delete("functions.PERCENTILECONT"),
    TemplateOp::Delete("types.interval"),
];

#[derive(Debug)]
pub struct SqliteGenerator {
    templates: TemplateSet,
}

impl SqliteGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, SQLITE_TEMPLATES]),
        }
    }

    /// SQLite shifts dates through `datetime(.., '+N unit')` modifiers,
    /// one per interval unit in the fixed order.
    fn shift_interval(&self, date: &str, interval: &SqlInterval, sign: char) -> String {
        let modifiers: Vec<String> = interval
            .units()
            .into_iter()
            .map(|(amount, unit)| {
                let (amount, unit) = match unit {
                    Granularity::Quarter => (amount * 3, Granularity::Month),
                    Granularity::Week => (amount * 7, Granularity::Day),
                    other => (amount, other),
                };
                format!(", '{}{} {}s'", sign, amount, unit)
            })
            .collect();
        format!("datetime({}{})", date, modifiers.join(""))
    }
}

impl Default for SqliteGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for SqliteGenerator {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("datetime({})", value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("datetime({})", value)
    }

    fn cast_to_string(&self, sql: &str) -> String {
        format!("CAST({} AS TEXT)", sql)
    }

    fn time_grouped_column(
        &self,
        granularity: Granularity,
        column: &str,
    ) -> PolysqlResult<String> {
        let format = match granularity {
            Granularity::Second => "%Y-%m-%dT%H:%M:%S.000",
            Granularity::Minute => "%Y-%m-%dT%H:%M:00.000",
            Granularity::Hour => "%Y-%m-%dT%H:00:00.000",
            Granularity::Day => "%Y-%m-%dT00:00:00.000",
            Granularity::Month => "%Y-%m-01T00:00:00.000",
            Granularity::Year => "%Y-01-01T00:00:00.000",
            Granularity::Week => {
                return Ok(format!(
                    "strftime('%Y-%m-%dT00:00:00.000', {}, 'weekday 1', '-7 days')",
                    column
                ));
            }
            Granularity::Quarter => {
                return Err(PolysqlError::unsupported(
                    self.name(),
                    "Quarter granularity",
                ));
            }
        };
        Ok(format!("strftime('{}', {})", format, column))
    }

    fn add_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, '+'))
    }

    fn subtract_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, '-'))
    }

    fn date_bin(
        &self,
        interval: &SqlInterval,
        _source: &str,
        _origin: &str,
    ) -> PolysqlResult<String> {
        if interval.classify().is_none() {
            return Err(PolysqlError::unsupported(
                self.name(),
                format!(
                    "Intervals mixing calendar and clock units ('{}') in date_bin",
                    interval
                ),
            ));
        }
        Err(PolysqlError::unsupported(self.name(), "Interval binning"))
    }

    fn like_ignore_case(
        &self,
        column: &str,
        negate: bool,
        param: &str,
        match_type: MatchType,
    ) -> String {
        let prefix = if match_type.has_leading_wildcard() {
            "'%' || "
        } else {
            ""
        };
        let suffix = if match_type.has_trailing_wildcard() {
            " || '%'"
        } else {
            ""
        };
        let not = if negate { " NOT" } else { "" };
        // SQLite LIKE is case-insensitive for ASCII already; LOWER keeps
        // the behavior predictable for mixed-case data
        format!(
            "LOWER({}){} LIKE {}LOWER({}){}",
            column, not, prefix, param, suffix
        )
    }
}
