use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::{MatchType, SqlGenerator};
use crate::error::{PolysqlError, PolysqlResult};
use crate::time::{Granularity, SqlInterval, TimeSeries};

const HIVE_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("quotes.identifiers", "`"),
    TemplateOp::Set("quotes.escape", "``"),
    TemplateOp::Set("types.string", "STRING"),
    TemplateOp::Set("types.binary", "BINARY"),
    TemplateOp::Set("functions.STRING_AGG", "concat_ws({{ args[1] }}, collect_list({{ args[0] }}))"),
    TemplateOp::Delete("functions.PERCENTILECONT"),
    TemplateOp::Delete("types.interval"),
];

#[derive(Debug)]
pub struct HiveGenerator {
    templates: TemplateSet,
}

impl HiveGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, HIVE_TEMPLATES]),
        }
    }

    fn shift_interval(&self, date: &str, interval: &SqlInterval, sign: char) -> String {
        let steps: Vec<String> = interval
            .units()
            .into_iter()
            .map(|(amount, unit)| {
                format!("INTERVAL {} {}", amount, unit.as_str().to_uppercase())
            })
            .collect();
        format!("{} {} {}", date, sign, steps.join(&format!(" {} ", sign)))
    }
}

impl Default for HiveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for HiveGenerator {
    fn name(&self) -> &'static str {
        "hive"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn escape_column_name(&self, name: &str) -> String {
        format!("`{}`", name)
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(128)
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("CAST({} AS TIMESTAMP)", value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("CAST({} AS TIMESTAMP)", value)
    }

    fn cast_to_string(&self, sql: &str) -> String {
        format!("CAST({} AS STRING)", sql)
    }

    fn convert_tz(&self, field: &str, timezone: &str) -> PolysqlResult<String> {
        Ok(format!("from_utc_timestamp({}, '{}')", field, timezone))
    }

    fn time_grouped_column(
        &self,
        granularity: Granularity,
        column: &str,
    ) -> PolysqlResult<String> {
        let format = match granularity {
            Granularity::Second => "yyyy-MM-dd HH:mm:ss",
            Granularity::Minute => "yyyy-MM-dd HH:mm:00",
            Granularity::Hour => "yyyy-MM-dd HH:00:00",
            Granularity::Day => "yyyy-MM-dd 00:00:00",
            Granularity::Month => "yyyy-MM-01 00:00:00",
            Granularity::Year => "yyyy-01-01 00:00:00",
            Granularity::Week => {
                return Ok(format!(
                    "DATE_ADD(DATE_FORMAT({}, 'yyyy-MM-dd 00:00:00'), 1 - CAST(DATE_FORMAT({}, 'u') AS INT))",
                    column, column
                ));
            }
            Granularity::Quarter => {
                return Err(PolysqlError::unsupported(
                    self.name(),
                    "Quarter granularity",
                ));
            }
        };
        Ok(format!("DATE_FORMAT({}, '{}')", column, format))
    }

    fn add_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, '+'))
    }

    fn subtract_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(self.shift_interval(date, interval, '-'))
    }

    fn date_bin_calendar(&self, months: u32, source: &str, origin: &str) -> String {
        let origin_ts = self.date_time_cast(&format!("'{}'", origin));
        format!(
            "add_months({origin}, {months} * FLOOR(months_between({source}, {origin}) / {months}))",
            origin = origin_ts,
            months = months,
            source = source
        )
    }

    fn date_bin_clock(&self, interval: &SqlInterval, source: &str, origin: &str) -> String {
        let origin_ts = self.date_time_cast(&format!("'{}'", origin));
        format!(
            "from_unixtime(unix_timestamp({origin}) + {seconds} * FLOOR((unix_timestamp({source}) - unix_timestamp({origin})) / {seconds}))",
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
                    "SELECT {} date_from, {} date_to",
                    self.date_time_cast(&format!("'{}'", from)),
                    self.date_time_cast(&format!("'{}'", to))
                )
            })
            .collect();
        rows.join(" UNION ALL ")
    }

    // Hive resolves GROUP BY against expressions, not select positions
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
}
