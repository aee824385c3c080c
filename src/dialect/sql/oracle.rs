use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::{MatchType, SqlGenerator};
use crate::error::PolysqlResult;
use crate::params::PlaceholderStyle;
use crate::time::{Granularity, SqlInterval, TimeSeries};

const ORACLE_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("types.string", "VARCHAR2(4000)"),
    TemplateOp::Set("types.boolean", "NUMBER(1)"),
    TemplateOp::Set("types.double", "BINARY_DOUBLE"),
    TemplateOp::Set("types.binary", "BLOB"),
    TemplateOp::Set("functions.STRING_AGG", "LISTAGG({{ args_concat }})"),
    TemplateOp::Set("functions.NOW", "SYSTIMESTAMP"),
    TemplateOp::Delete("functions.CONCAT"),
];

#[derive(Debug)]
pub struct OracleGenerator {
    templates: TemplateSet,
}

impl OracleGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, ORACLE_TEMPLATES]),
        }
    }

    /// Oracle interval literals carry one unit each, and there is no
    /// WEEK or QUARTER unit, so those normalize to days and months.
    fn shift_interval(&self, date: &str, interval: &SqlInterval, sign: char) -> String {
        let mut steps = Vec::new();
        for (amount, unit) in interval.units() {
            let (amount, unit) = match unit {
                Granularity::Quarter => (amount * 3, "MONTH"),
                Granularity::Week => (amount * 7, "DAY"),
                other => (amount, other.as_str()),
            };
            steps.push(format!("INTERVAL '{}' {}", amount, unit.to_uppercase()));
        }
        format!("{} {} {}", date, sign, steps.join(&format!(" {} ", sign)))
    }
}

impl Default for OracleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for OracleGenerator {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Colon
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(128)
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("TO_TIMESTAMP({}, 'YYYY-MM-DD\"T\"HH24:MI:SS.FF3')", value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        self.time_stamp_cast(value)
    }

    fn cast_to_string(&self, sql: &str) -> String {
        format!("TO_CHAR({})", sql)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!(
            "FROM_TZ(CAST({} AS TIMESTAMP), 'UTC') AT TIME ZONE '{}'",
            field, timezone
        ))
    }

    fn time_grouped_column(
        &self,
        granularity: Granularity,
        column: &str,
    ) -> PolysqlResult<String> {
        let sql = match granularity {
            Granularity::Second => format!("CAST({} AS DATE)", column),
            Granularity::Minute => format!("TRUNC({}, 'MI')", column),
            Granularity::Hour => format!("TRUNC({}, 'HH24')", column),
            Granularity::Day => format!("TRUNC({})", column),
            Granularity::Week => format!("TRUNC({}, 'IW')", column),
            Granularity::Month => format!("TRUNC({}, 'MM')", column),
            Granularity::Quarter => format!("TRUNC({}, 'Q')", column),
            Granularity::Year => format!("TRUNC({}, 'YYYY')", column),
        };
        Ok(sql)
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
            "ADD_MONTHS({origin}, {months} * FLOOR(MONTHS_BETWEEN({source}, {origin}) / {months}))",
            origin = origin_ts,
            months = months,
            source = source
        )
    }

    fn date_bin_clock(&self, interval: &SqlInterval, source: &str, origin: &str) -> String {
        let origin_ts = self.time_stamp_cast(&format!("'{}'", origin));
        format!(
            "{origin} + NUMTODSINTERVAL({seconds} * FLOOR(({source} - {origin}) * 86400 / {seconds}), 'SECOND')",
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

    fn series_sql(&self, series: &TimeSeries) -> String {
        let rows: Vec<String> = series
            .buckets()
            .iter()
            .map(|(from, to)| {
                format!(
                    "SELECT {} date_from, {} date_to FROM dual",
                    self.date_time_cast(&format!("'{}'", from)),
                    self.date_time_cast(&format!("'{}'", to))
                )
            })
            .collect();
        rows.join(" UNION ALL ")
    }

    // Oracle has no ordinal GROUP BY
    fn group_by_clause(&self, expressions: &[String]) -> String {
        if expressions.is_empty() {
            return String::new();
        }
        format!(" GROUP BY {}", expressions.join(", "))
    }

    fn wrap_segment_for_dimension_select(&self, sql: &str) -> String {
        format!("CASE WHEN {} THEN 1 ELSE 0 END", sql)
    }

    fn as_syntax_table(&self) -> &'static str {
        ""
    }

    fn as_syntax_join(&self) -> &'static str {
        ""
    }

    fn now_timestamp_sql(&self) -> String {
        "SYSTIMESTAMP".to_string()
    }

    fn unix_timestamp_sql(&self) -> String {
        "(CAST(SYS_EXTRACT_UTC(SYSTIMESTAMP) AS DATE) - DATE '1970-01-01') * 86400".to_string()
    }
}
