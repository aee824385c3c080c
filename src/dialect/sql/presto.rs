use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::{MatchType, SqlGenerator};
use crate::error::PolysqlResult;
use crate::time::{Granularity, SqlInterval};

const PRESTO_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("types.string", "VARCHAR"),
    TemplateOp::Set("types.double", "DOUBLE"),
    TemplateOp::Set("types.binary", "VARBINARY"),
    TemplateOp::Set(
        "functions.PERCENTILECONT",
        "APPROX_PERCENTILE({{ args_concat }})",
    ),
    TemplateOp::Set("expressions.timestamp_literal", "from_iso8601_timestamp('{{ value }}')"),
];

/// Presto. Also serves the `trino` registry key; the fork kept the SQL
/// surface this crate renders.
#[derive(Debug)]
pub struct PrestoGenerator {
    templates: TemplateSet,
}

impl PrestoGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, PRESTO_TEMPLATES]),
        }
    }

    /// Presto interval literals carry one unit each and have no WEEK or
    /// QUARTER unit.
    fn shift_interval(&self, date: &str, interval: &SqlInterval, sign: char) -> String {
        let mut steps = Vec::new();
        for (amount, unit) in interval.units() {
            let (amount, unit) = match unit {
                Granularity::Quarter => (amount * 3, "month"),
                Granularity::Week => (amount * 7, "day"),
                other => (amount, other.as_str()),
            };
            steps.push(format!("interval '{}' {}", amount, unit));
        }
        format!("{} {} {}", date, sign, steps.join(&format!(" {} ", sign)))
    }
}

impl Default for PrestoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for PrestoGenerator {
    fn name(&self) -> &'static str {
        "presto"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("from_iso8601_timestamp({})", value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("from_iso8601_timestamp({})", value)
    }

    fn cast_to_string(&self, sql: &str) -> String {
        format!("CAST({} as VARCHAR)", sql)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!("({} AT TIME ZONE '{}')", field, timezone))
    }

    fn time_grouped_column(
        &self,
        granularity: Granularity,
        column: &str,
    ) -> PolysqlResult<String> {
        Ok(format!("date_trunc('{}', {})", granularity, column))
    }

    fn add_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, '+'))
    }

    fn subtract_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, '-'))
    }

    fn date_bin_calendar(&self, months: u32, source: &str, origin: &str) -> String {
        let origin_ts = self.time_stamp_cast(&format!("'{}'", origin));
        format!(
            "date_add('month', {months} * FLOOR(date_diff('month', {origin}, {source}) / {months}), {origin})",
            origin = origin_ts,
            months = months,
            source = source
        )
    }

    fn date_bin_clock(&self, interval: &SqlInterval, source: &str, origin: &str) -> String {
        let origin_ts = self.time_stamp_cast(&format!("'{}'", origin));
        format!(
            "date_add('second', {seconds} * FLOOR(date_diff('second', {origin}, {source}) / {seconds}), {origin})",
            origin = origin_ts,
            seconds = interval.total_seconds(),
            source = source
        )
    }

    fn hll_init(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("cast(approx_set({}) as varbinary)", sql))
    }

    fn hll_merge(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!(
            "cardinality(merge(cast({} as HyperLogLog)))",
            sql
        ))
    }

    fn count_distinct_approx(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("approx_distinct({})", sql))
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
        format!(
            "LOWER({}){} LIKE {}LOWER({}){}",
            column, not, prefix, param, suffix
        )
    }
}
