use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::{MatchType, SqlGenerator};
use crate::error::PolysqlResult;
use crate::time::{Granularity, SqlInterval, TimeSeries};

const CLICKHOUSE_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set(
        "functions.STRING_AGG",
        "arrayStringConcat(group{% if distinct %}Uniq{% endif %}Array({{ args[0] }}), {{ args[1] }})",
    ),
    TemplateOp::Set(
        "expressions.timestamp_literal",
        "parseDateTimeBestEffort('{{ value }}')",
    ),
    TemplateOp::Set("quotes.identifiers", "`"),
    TemplateOp::Set("quotes.escape", "\\`"),
    TemplateOp::Set("types.boolean", "BOOL"),
    TemplateOp::Set("types.timestamp", "DATETIME"),
    TemplateOp::Delete("functions.PERCENTILECONT"),
    TemplateOp::Delete("expressions.like_escape"),
    TemplateOp::Delete("types.time"),
    // ClickHouse intervals have a distinct type for each granularity
    TemplateOp::Delete("types.interval"),
    TemplateOp::Delete("types.binary"),
];

#[derive(Debug)]
pub struct ClickhouseGenerator {
    templates: TemplateSet,
}

impl ClickhouseGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, CLICKHOUSE_TEMPLATES]),
        }
    }

    /// Sum of single-unit intervals: `INTERVAL 2 YEAR + INTERVAL 3 DAY`.
    fn format_interval(&self, interval: &SqlInterval) -> String {
        interval
            .units()
            .iter()
            .map(|(amount, unit)| format!("INTERVAL {} {}", amount, unit.as_str().to_uppercase()))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl Default for ClickhouseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for ClickhouseGenerator {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn escape_column_name(&self, name: &str) -> String {
        format!("`{}`", name)
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        self.date_time_cast(value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("parseDateTimeBestEffort({})", value)
    }

    fn cast_to_string(&self, sql: &str) -> String {
        format!("CAST({} as String)", sql)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        // field yields a Date or a DateTime, the extra toDateTime64
        // covers the Date case
        Ok(format!(
            "toTimeZone(toDateTime64({}, 0), '{}')",
            field, timezone
        ))
    }

    fn time_grouped_column(
        &self,
        granularity: Granularity,
        column: &str,
    ) -> PolysqlResult<String> {
        let inner = match granularity {
            Granularity::Second => format!("toDateTime64({}, 0)", column),
            Granularity::Minute => format!("toStartOfMinute({})", column),
            Granularity::Hour => format!("toStartOfHour({})", column),
            Granularity::Day => format!("toStartOfDay({})", column),
            Granularity::Week => format!("toMonday({})", column),
            Granularity::Month => format!("toStartOfMonth({})", column),
            Granularity::Quarter => format!("toStartOfQuarter({})", column),
            Granularity::Year => format!("toStartOfYear({})", column),
        };
        Ok(format!("toDateTime64({}, 0)", inner))
    }

    fn add_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(format!(
            "addDate({}, {})",
            date,
            self.format_interval(interval)
        ))
    }

    fn subtract_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(format!(
            "subDate({}, {})",
            date,
            self.format_interval(interval)
        ))
    }

    fn date_bin_calendar(&self, months: u32, source: &str, origin: &str) -> String {
        let origin_ts = self.date_time_cast(&format!("'{}'", origin));
        format!(
            "date_add(MONTH, FLOOR(date_diff(MONTH, {origin}, {source}) / {months}) * {months}, {origin})",
            origin = origin_ts,
            months = months,
            source = source
        )
    }

    fn date_bin_clock(&self, interval: &SqlInterval, source: &str, origin: &str) -> String {
        let origin_ts = self.date_time_cast(&format!("'{}'", origin));
        format!(
            "date_add(SECOND, FLOOR(date_diff(SECOND, {origin}, {source}) / {seconds}) * {seconds}, {origin})",
            origin = origin_ts,
            seconds = interval.total_seconds(),
            source = source
        )
    }

    fn count_distinct_approx(&self, sql: &str) -> PolysqlResult<String> {
        Ok(format!("uniq({})", sql))
    }

    fn like_ignore_case(
        &self,
        column: &str,
        negate: bool,
        param: &str,
        match_type: MatchType,
    ) -> String {
        let prefix = if match_type.has_leading_wildcard() {
            "%"
        } else {
            ""
        };
        let suffix = if match_type.has_trailing_wildcard() {
            "%"
        } else {
            ""
        };
        let not = if negate { " NOT" } else { "" };
        format!(
            "{}{} ILIKE CONCAT('{}', {}, '{}')",
            column, not, prefix, param, suffix
        )
    }

    fn series_sql(&self, series: &TimeSeries) -> String {
        let mut dates_from = Vec::new();
        let mut dates_to = Vec::new();
        for (from, to) in series.buckets() {
            dates_from.push(format!("'{}'", from));
            dates_to.push(format!("'{}'", to));
        }
        format!(
            "SELECT parseDateTimeBestEffort(arrayJoin([{}])) as date_from, parseDateTimeBestEffort(arrayJoin([{}])) as date_to",
            dates_from.join(","),
            dates_to.join(",")
        )
    }

    // ClickHouse can't group by select position
    fn group_by_clause(&self, expressions: &[String]) -> String {
        if expressions.is_empty() {
            return String::new();
        }
        format!(" GROUP BY {}", expressions.join(", "))
    }

    fn concat_strings(&self, strings: &[String]) -> String {
        format!("toString({})", strings.join(") || toString("))
    }
}
