use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::{MatchType, SqlGenerator};
use crate::error::{PolysqlError, PolysqlResult};
use crate::time::{Granularity, SqlInterval};

const HANA_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("types.string", "NVARCHAR(5000)"),
    TemplateOp::Set("types.double", "DOUBLE"),
    TemplateOp::Set("types.binary", "VARBINARY(5000)"),
    TemplateOp::Set("functions.STRING_AGG", "STRING_AGG({{ args_concat }})"),
    TemplateOp::Delete("types.interval"),
];

#[derive(Debug)]
pub struct HanaGenerator {
    templates: TemplateSet,
}

impl HanaGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, HANA_TEMPLATES]),
        }
    }

    /// HANA shifts timestamps through ADD_YEARS/ADD_MONTHS/ADD_DAYS/
    /// ADD_SECONDS; quarters, weeks and sub-day units normalize into
    /// those four.
    fn shift_interval(&self, date: &str, interval: &SqlInterval, negate: bool) -> String {
        let mut sql = date.to_string();
        for (amount, unit) in interval.units() {
            let (function, amount) = match unit {
                Granularity::Year => ("ADD_YEARS", u64::from(amount)),
                Granularity::Quarter => ("ADD_MONTHS", u64::from(amount) * 3),
                Granularity::Month => ("ADD_MONTHS", u64::from(amount)),
                Granularity::Week => ("ADD_DAYS", u64::from(amount) * 7),
                Granularity::Day => ("ADD_DAYS", u64::from(amount)),
                Granularity::Hour => ("ADD_SECONDS", u64::from(amount) * 3600),
                Granularity::Minute => ("ADD_SECONDS", u64::from(amount) * 60),
                Granularity::Second => ("ADD_SECONDS", u64::from(amount)),
            };
            let signed = if negate {
                format!("-{}", amount)
            } else {
                amount.to_string()
            };
            sql = format!("{}({}, {})", function, sql, signed);
        }
        sql
    }
}

impl Default for HanaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for HanaGenerator {
    fn name(&self) -> &'static str {
        "hana"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(127)
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("TO_TIMESTAMP({})", value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("TO_TIMESTAMP({})", value)
    }

    fn cast_to_string(&self, sql: &str) -> String {
        format!("TO_NVARCHAR({})", sql)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!("UTCTOLOCAL({}, '{}')", field, timezone))
    }

    fn time_grouped_column(
        &self,
        granularity: Granularity,
        column: &str,
    ) -> PolysqlResult<String> {
        match granularity {
            Granularity::Week => Err(PolysqlError::unsupported(self.name(), "Week granularity")),
            other => Ok(format!(
                "SERIES_ROUND({}, 'INTERVAL 1 {}')",
                column,
                other.as_str().to_uppercase()
            )),
        }
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
            "ADD_MONTHS({origin}, {months} * FLOOR(MONTHS_BETWEEN({origin}, {source}) / {months}))",
            origin = origin_ts,
            months = months,
            source = source
        )
    }

    fn date_bin_clock(&self, interval: &SqlInterval, source: &str, origin: &str) -> String {
        let origin_ts = self.time_stamp_cast(&format!("'{}'", origin));
        format!(
            "ADD_SECONDS({origin}, {seconds} * FLOOR(SECONDS_BETWEEN({origin}, {source}) / {seconds}))",
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

    // HANA has no ordinal GROUP BY
    fn group_by_clause(&self, expressions: &[String]) -> String {
        if expressions.is_empty() {
            return String::new();
        }
        format!(" GROUP BY {}", expressions.join(", "))
    }

    fn wrap_segment_for_dimension_select(&self, sql: &str) -> String {
        format!("CASE WHEN {} THEN 1 ELSE 0 END", sql)
    }

    fn now_timestamp_sql(&self) -> String {
        "CURRENT_UTCTIMESTAMP".to_string()
    }
}
