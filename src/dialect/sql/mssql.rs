use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::{MatchType, SqlGenerator};
use crate::error::{PolysqlError, PolysqlResult};
use crate::time::{Granularity, SqlInterval};

const MSSQL_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("quotes.identifiers", "["),
    TemplateOp::Set("quotes.escape", "]]"),
    TemplateOp::Set("types.string", "VARCHAR(MAX)"),
    TemplateOp::Set("types.boolean", "BIT"),
    TemplateOp::Set("types.timestamp", "DATETIME2"),
    TemplateOp::Set("types.double", "FLOAT"),
    TemplateOp::Set("types.binary", "VARBINARY(MAX)"),
    TemplateOp::Set("functions.NOW", "GETUTCDATE()"),
    TemplateOp::Set("functions.CEIL", "CEILING({{ args_concat }})"),
    TemplateOp::Delete("types.interval"),
];

#[derive(Debug)]
pub struct MssqlGenerator {
    templates: TemplateSet,
}

impl MssqlGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, MSSQL_TEMPLATES]),
        }
    }

    /// Nested `DATEADD` chain, one call per unit in the fixed order.
    fn shift_interval(&self, date: &str, interval: &SqlInterval, negate: bool) -> String {
        let mut sql = date.to_string();
        for (amount, unit) in interval.units() {
            let signed = if negate {
                format!("-{}", amount)
            } else {
                amount.to_string()
            };
            sql = format!("DATEADD({}, {}, {})", unit.as_str(), signed, sql);
        }
        sql
    }
}

impl Default for MssqlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for MssqlGenerator {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn escape_column_name(&self, name: &str) -> String {
        format!("[{}]", name)
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(128)
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("CAST({} AS DATETIME2)", value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("CAST({} AS DATETIME2)", value)
    }

    fn cast_to_string(&self, sql: &str) -> String {
        format!("CAST({} AS VARCHAR)", sql)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!(
            "{} AT TIME ZONE 'UTC' AT TIME ZONE '{}'",
            field, timezone
        ))
    }

    fn time_grouped_column(
        &self,
        granularity: Granularity,
        column: &str,
    ) -> PolysqlResult<String> {
        let sql = match granularity {
            Granularity::Second => {
                format!("DATEADD(second, DATEDIFF(second, '2000-01-01', {}), '2000-01-01')", column)
            }
            Granularity::Minute => format!("DATEADD(minute, DATEDIFF(minute, 0, {}), 0)", column),
            Granularity::Hour => format!("DATEADD(hour, DATEDIFF(hour, 0, {}), 0)", column),
            Granularity::Day => format!("DATEADD(day, DATEDIFF(day, 0, {}), 0)", column),
            Granularity::Week => {
                return Err(PolysqlError::unsupported(self.name(), "Week granularity"));
            }
            Granularity::Month => format!("DATEADD(month, DATEDIFF(month, 0, {}), 0)", column),
            Granularity::Quarter => {
                format!("DATEADD(quarter, DATEDIFF(quarter, 0, {}), 0)", column)
            }
            Granularity::Year => format!("DATEADD(year, DATEDIFF(year, 0, {}), 0)", column),
        };
        Ok(sql)
    }

    fn add_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, false))
    }

    fn subtract_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, true))
    }

    fn date_bin_calendar(&self, months: u32, source: &str, origin: &str) -> String {
        let origin_ts = self.time_stamp_cast(&format!("'{}'", origin));
        format!(
            "DATEADD(month, {months} * FLOOR(DATEDIFF(month, {origin}, {source}) / {months}), {origin})",
            origin = origin_ts,
            months = months,
            source = source
        )
    }

    fn date_bin_clock(&self, interval: &SqlInterval, source: &str, origin: &str) -> String {
        let origin_ts = self.time_stamp_cast(&format!("'{}'", origin));
        format!(
            "DATEADD(second, {seconds} * FLOOR(DATEDIFF(second, {origin}, {source}) / {seconds}), {origin})",
            origin = origin_ts,
            seconds = interval.total_seconds(),
            source = source
        )
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

    // SQL Server has no ordinal GROUP BY
    fn group_by_clause(&self, expressions: &[String]) -> String {
        if expressions.is_empty() {
            return String::new();
        }
        format!(" GROUP BY {}", expressions.join(", "))
    }

    fn wrap_segment_for_dimension_select(&self, sql: &str) -> String {
        format!("CASE WHEN {} THEN 1 ELSE 0 END", sql)
    }

    fn concat_strings(&self, strings: &[String]) -> String {
        format!("CONCAT({})", strings.join(", "))
    }

    fn now_timestamp_sql(&self) -> String {
        "GETUTCDATE()".to_string()
    }

    fn unix_timestamp_sql(&self) -> String {
        "DATEDIFF(second, '1970-01-01', GETUTCDATE())".to_string()
    }
}
