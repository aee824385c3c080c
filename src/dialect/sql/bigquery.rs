use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::{MatchType, SqlGenerator};
use crate::error::PolysqlResult;
use crate::time::{Granularity, SqlInterval, TimeSeries};

const BIGQUERY_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("quotes.identifiers", "`"),
    TemplateOp::Set("quotes.escape", "\\`"),
    TemplateOp::Set("types.string", "STRING"),
    TemplateOp::Set("types.boolean", "BOOL"),
    TemplateOp::Set("types.integer", "INT64"),
    TemplateOp::Set("types.bigint", "INT64"),
    TemplateOp::Set("types.float", "FLOAT64"),
    TemplateOp::Set("types.double", "FLOAT64"),
    TemplateOp::Set("types.decimal", "NUMERIC({{ precision }},{{ scale }})"),
    TemplateOp::Set("types.binary", "BYTES"),
    TemplateOp::Set("expressions.timestamp_literal", "TIMESTAMP('{{ value }}')"),
    TemplateOp::Set(
        "functions.STRING_AGG",
        "STRING_AGG({{ distinct }}{{ args_concat }})",
    ),
    TemplateOp::Delete("functions.PERCENTILECONT"),
];

#[derive(Debug)]
pub struct BigqueryGenerator {
    templates: TemplateSet,
}

impl BigqueryGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, BIGQUERY_TEMPLATES]),
        }
    }

    /// Nested `DATETIME_ADD`/`DATETIME_SUB` chain, one call per unit in
    /// the fixed year-to-second order. BigQuery intervals carry a
    /// single unit each.
    fn shift_interval(&self, date: &str, interval: &SqlInterval, function: &str) -> String {
        let mut sql = date.to_string();
        for (amount, unit) in interval.units() {
            sql = format!(
                "{}({}, INTERVAL {} {})",
                function,
                sql,
                amount,
                unit.as_str().to_uppercase()
            );
        }
        sql
    }
}

impl Default for BigqueryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for BigqueryGenerator {
    fn name(&self) -> &'static str {
        "bigquery"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn escape_column_name(&self, name: &str) -> String {
        format!("`{}`", name)
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(300)
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("TIMESTAMP({})", value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("DATETIME({})", value)
    }

    fn cast_to_string(&self, sql: &str) -> String {
        format!("CAST({} AS STRING)", sql)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!("DATETIME({}, '{}')", field, timezone))
    }

    fn time_grouped_column(
        &self,
        granularity: Granularity,
        column: &str,
    ) -> PolysqlResult<String> {
        let part = match granularity {
            Granularity::Second => "SECOND",
            Granularity::Minute => "MINUTE",
            Granularity::Hour => "HOUR",
            Granularity::Day => "DAY",
            Granularity::Week => "WEEK(MONDAY)",
            Granularity::Month => "MONTH",
            Granularity::Quarter => "QUARTER",
            Granularity::Year => "YEAR",
        };
        Ok(format!("DATETIME_TRUNC({}, {})", column, part))
    }

    fn add_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, "DATETIME_ADD"))
    }

    fn subtract_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, "DATETIME_SUB"))
    }

    fn date_bin_calendar(&self, months: u32, source: &str, origin: &str) -> String {
        let origin_ts = self.date_time_cast(&format!("'{}'", origin));
        format!(
            "DATETIME_ADD({origin}, INTERVAL {months} * DIV(DATETIME_DIFF({source}, {origin}, MONTH), {months}) MONTH)",
            origin = origin_ts,
            months = months,
            source = source
        )
    }

    fn date_bin_clock(&self, interval: &SqlInterval, source: &str, origin: &str) -> String {
        let origin_ts = self.date_time_cast(&format!("'{}'", origin));
        format!(
            "DATETIME_ADD({origin}, INTERVAL {seconds} * DIV(DATETIME_DIFF({source}, {origin}, SECOND), {seconds}) SECOND)",
            origin = origin_ts,
            seconds = interval.total_seconds(),
            source = source
        )
    }

    fn hll_init(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("HLL_COUNT.INIT({})", sql))
    }

    fn hll_merge(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("HLL_COUNT.MERGE({})", sql))
    }

    fn count_distinct_approx(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("APPROX_COUNT_DISTINCT({})", sql))
    }

    fn like_ignore_case(
        &self,
        column: &str,
        negate: bool,
        param: &str,
        match_type: MatchType,
    ) -> String {
        let mut parts = Vec::new();
        if match_type.has_leading_wildcard() {
            parts.push("'%'".to_string());
        }
        parts.push(format!("LOWER({})", param));
        if match_type.has_trailing_wildcard() {
            parts.push("'%'".to_string());
        }
        let not = if negate { " NOT" } else { "" };
        format!(
            "LOWER({}){} LIKE {}",
            column,
            not,
            self.concat_strings(&parts)
        )
    }

    fn series_sql(&self, series: &TimeSeries) -> String {
        let rows: Vec<String> = series
            .buckets()
            .iter()
            .map(|(from, to)| format!("SELECT '{}' f, '{}' t", from, to))
            .collect();
        format!(
            "SELECT {} date_from, {} date_to FROM ({}) AS dates",
            self.date_time_cast("dates.f"),
            self.date_time_cast("dates.t"),
            rows.join(" UNION ALL ")
        )
    }

    fn wrap_segment_for_dimension_select(&self, sql: &str) -> String {
        format!("IF({}, 1, 0)", sql)
    }

    fn concat_strings(&self, strings: &[String]) -> String {
        format!("CONCAT({})", strings.join(", "))
    }
}
