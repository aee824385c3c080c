use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::{MatchType, SqlGenerator};
use crate::error::PolysqlResult;
use crate::time::{Granularity, SqlInterval, TimeSeries};

/// Template layer shared by the MySQL wire family
/// (mysql, mariadb, mongobi).
pub const MYSQL_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("quotes.identifiers", "`"),
    TemplateOp::Set("quotes.escape", "``"),
    TemplateOp::Set("types.string", "VARCHAR(255)"),
    TemplateOp::Set("types.boolean", "TINYINT(1)"),
    TemplateOp::Set("types.timestamp", "DATETIME"),
    TemplateOp::Set("types.double", "DOUBLE"),
    TemplateOp::Set("types.binary", "BLOB"),
    TemplateOp::Set("expressions.timestamp_literal", "TIMESTAMP('{{ value }}')"),
    TemplateOp::Set(
        "functions.STRING_AGG",
        "GROUP_CONCAT({{ args[0] }} SEPARATOR {{ args[1] }})",
    ),
    TemplateOp::Delete("functions.PERCENTILECONT"),
    TemplateOp::Delete("types.interval"),
];

/// MySQL. Also serves the `mariadb` and `mongobi` registry keys, both
/// of which speak the MySQL dialect.
#[derive(Debug)]
pub struct MysqlGenerator {
    templates: TemplateSet,
}

impl MysqlGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, MYSQL_TEMPLATES]),
        }
    }

    /// `DATE_ADD`/`DATE_SUB` chain, one step per interval unit in the
    /// fixed year-to-second order. MySQL has no mixed-unit interval
    /// literal.
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

impl Default for MysqlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for MysqlGenerator {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn escape_column_name(&self, name: &str) -> String {
        format!("`{}`", name)
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(64)
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("TIMESTAMP({})", value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("TIMESTAMP({})", value)
    }

    fn cast_to_string(&self, sql: &str) -> String {
        format!("CAST({} AS CHAR)", sql)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!(
            "CONVERT_TZ({}, @@session.time_zone, '{}')",
            field, timezone
        ))
    }

    fn time_grouped_column(
        &self,
        granularity: Granularity,
        column: &str,
    ) -> PolysqlResult<String> {
        let format = match granularity {
            Granularity::Second => "%Y-%m-%d %H:%i:%s",
            Granularity::Minute => "%Y-%m-%d %H:%i:00",
            Granularity::Hour => "%Y-%m-%d %H:00:00",
            Granularity::Day => "%Y-%m-%d 00:00:00",
            Granularity::Month => "%Y-%m-01 00:00:00",
            Granularity::Year => "%Y-01-01 00:00:00",
            Granularity::Week => {
                return Ok(format!(
                    "CAST(DATE_FORMAT(DATE_SUB({}, INTERVAL WEEKDAY({}) DAY), '%Y-%m-%d 00:00:00') AS DATETIME)",
                    column, column
                ));
            }
            Granularity::Quarter => {
                return Ok(format!(
                    "CAST(CONCAT(YEAR({}), '-', LPAD(1 + 3 * (QUARTER({}) - 1), 2, '0'), '-01 00:00:00') AS DATETIME)",
                    column, column
                ));
            }
        };
        Ok(format!(
            "CAST(DATE_FORMAT({}, '{}') AS DATETIME)",
            column, format
        ))
    }

    fn add_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, "DATE_ADD"))
    }

    fn subtract_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, "DATE_SUB"))
    }

    fn date_bin_calendar(&self, months: u32, source: &str, origin: &str) -> String {
        let origin_ts = self.time_stamp_cast(&format!("'{}'", origin));
        format!(
            "DATE_ADD({origin}, INTERVAL {months} * FLOOR(TIMESTAMPDIFF(MONTH, {origin}, {source}) / {months}) MONTH)",
            origin = origin_ts,
            months = months,
            source = source
        )
    }

    fn date_bin_clock(&self, interval: &SqlInterval, source: &str, origin: &str) -> String {
        let origin_ts = self.time_stamp_cast(&format!("'{}'", origin));
        format!(
            "DATE_ADD({origin}, INTERVAL {seconds} * FLOOR(TIMESTAMPDIFF(SECOND, {origin}, {source}) / {seconds}) SECOND)",
            origin = origin_ts,
            seconds = interval.total_seconds(),
            source = source
        )
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
            .map(|(from, to)| {
                format!(
                    "SELECT TIMESTAMP('{}') date_from, TIMESTAMP('{}') date_to",
                    from, to
                )
            })
            .collect();
        rows.join(" UNION ALL ")
    }

    fn wrap_segment_for_dimension_select(&self, sql: &str) -> String {
        format!("IF({}, 1, 0)", sql)
    }

    fn concat_strings(&self, strings: &[String]) -> String {
        format!("CONCAT({})", strings.join(", "))
    }
}
