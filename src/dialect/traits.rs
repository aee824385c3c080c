//! The dialect contract: every backend implements [`SqlGenerator`],
//! inheriting Postgres-flavored defaults and overriding only where the
//! backend diverges.

use crate::error::{PolysqlError, PolysqlResult};
use crate::params::PlaceholderStyle;
use crate::time::{Granularity, IntervalScale, SqlInterval, TimeSeries};

use super::templates::TemplateSet;

/// Pattern-match shape for case-insensitive LIKE rendering.
///
/// Wildcard placement is fixed by the match type, never by the dialect:
/// `Starts` always appends a trailing wildcard and never prepends one,
/// `Ends` is the mirror, `Contains` wraps both sides, `Exact` neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Contains,
    Starts,
    Ends,
    Exact,
}

impl MatchType {
    pub fn has_leading_wildcard(&self) -> bool {
        matches!(self, MatchType::Contains | MatchType::Ends)
    }

    pub fn has_trailing_wildcard(&self) -> bool {
        matches!(self, MatchType::Contains | MatchType::Starts)
    }
}

/// Trait for dialect-specific SQL generation.
///
/// Implementations are stateless rendering strategies: one instance can
/// be shared across any number of compilations. Default method bodies
/// carry the generic (Postgres-flavored) behavior; a variant overrides a
/// hook only when its backend renders that fragment differently, or
/// lacks the capability entirely and must fail with
/// [`PolysqlError::UnsupportedFeature`].
pub trait SqlGenerator: std::fmt::Debug + Send + Sync {
    /// Registry-facing dialect name, used in error messages.
    fn name(&self) -> &'static str;

    /// This variant's resolved template set (see
    /// [`TemplateSet::resolve`](super::templates::TemplateSet::resolve)).
    fn sql_templates(&self) -> &TemplateSet;

    /// Wrap a column/table name in the dialect's identifier quotes.
    fn escape_column_name(&self, name: &str) -> String {
        format!("\"{}\"", name)
    }

    /// Maximum length of a generated identifier, if the backend has one.
    fn max_identifier_length(&self) -> Option<usize> {
        None
    }

    /// Validate a generated alias against the identifier length limit.
    fn checked_alias(&self, alias: &str) -> PolysqlResult<String> {
        if let Some(limit) = self.max_identifier_length() {
            if alias.len() > limit {
                return Err(PolysqlError::NamingConstraintViolation {
                    identifier: alias.to_string(),
                    limit,
                    dialect: self.name(),
                });
            }
        }
        Ok(alias.to_string())
    }

    /// Wire placeholder family used when building final SQL.
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Question
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("{}::timestamptz", value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("{}::timestamp", value)
    }

    fn cast_to_string(&self, sql: &str) -> String {
        format!("CAST({} as TEXT)", sql)
    }

    /// Convert `field` from UTC into `timezone`.
    fn convert_tz(&self, _field: &str, _timezone: &str) -> PolysqlResult<String> {
        Err(PolysqlError::unsupported(
            self.name(),
            "Timezone conversion",
        ))
    }

    /// Truncate `column` to the start of its `granularity` bucket.
    fn time_grouped_column(
        &self,
        granularity: Granularity,
        column: &str,
    ) -> PolysqlResult<String> {
        Ok(format!("date_trunc('{}', {})", granularity, column))
    }

    /// Shift a timestamp expression forward by `interval`.
    fn add_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(format!("{} + interval '{}'", date, interval))
    }

    /// Shift a timestamp expression backward by `interval`.
    fn subtract_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        Ok(format!("{} - interval '{}'", date, interval))
    }

    /// Bucket `source` relative to `origin` at `interval` width.
    ///
    /// Intervals mixing calendar units (year/quarter/month) with clock
    /// units (week/day/hour/minute/second) have no well-defined width
    /// and are rejected for every dialect.
    fn date_bin(
        &self,
        interval: &SqlInterval,
        source: &str,
        origin: &str,
    ) -> PolysqlResult<String> {
        match interval.classify() {
            None => Err(PolysqlError::unsupported(
                self.name(),
                format!(
                    "Intervals mixing calendar and clock units ('{}') in date_bin",
                    interval
                ),
            )),
            Some(IntervalScale::Calendar) => {
                Ok(self.date_bin_calendar(interval.total_months(), source, origin))
            }
            Some(IntervalScale::Clock) => Ok(self.date_bin_clock(interval, source, origin)),
        }
    }

    /// Calendar-scale binning: elapsed months since `origin`,
    /// floor-divided by the bucket width in months and re-applied
    /// through the date-add primitive.
    fn date_bin_calendar(&self, months: u32, source: &str, origin: &str) -> String {
        let origin_ts = self.time_stamp_cast(&format!("'{}'", origin));
        format!(
            "{origin} + INTERVAL '1 month' * ({months} * FLOOR((EXTRACT(YEAR FROM AGE({source}, {origin})) * 12 + EXTRACT(MONTH FROM AGE({source}, {origin}))) / {months}))",
            origin = origin_ts,
            months = months,
            source = source
        )
    }

    /// Clock-scale binning: epoch-seconds distance truncated to the
    /// bucket width.
    fn date_bin_clock(&self, interval: &SqlInterval, source: &str, origin: &str) -> String {
        let origin_ts = self.time_stamp_cast(&format!("'{}'", origin));
        format!(
            "{origin} + INTERVAL '{interval}' * FLOOR(EXTRACT(EPOCH FROM ({source} - {origin})) / {seconds})",
            origin = origin_ts,
            interval = interval,
            source = source,
            seconds = interval.total_seconds()
        )
    }

    /// Sketch initialization for partial approximate-distinct rollups.
    fn hll_init(&self, _sql: &str) -> PolysqlResult<String> {
        Err(PolysqlError::unsupported(
            self.name(),
            "Distributed approximate distinct count",
        ))
    }

    /// Merge previously built sketches into a cardinality estimate.
    fn hll_merge(&self, _sql: &str) -> PolysqlResult<String> {
        Err(PolysqlError::unsupported(
            self.name(),
            "Distributed approximate distinct count",
        ))
    }

    /// One-shot approximate distinct count.
    fn count_distinct_approx(&self, _sql: &str) -> PolysqlResult<String> {
        Err(PolysqlError::unsupported(
            self.name(),
            "Approximate distinct count",
        ))
    }

    /// Case-insensitive pattern match against an allocated parameter
    /// marker. `match_type` alone decides wildcard placement.
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
        format!("{}{} ILIKE {}{}{}", column, not, prefix, param, suffix)
    }

    /// Inline derived table of (date_from, date_to) rows for a time
    /// series, used as the left side of gap-filling joins.
    fn series_sql(&self, series: &TimeSeries) -> String {
        let values: Vec<String> = series
            .buckets()
            .iter()
            .map(|(from, to)| format!("('{}', '{}')", from, to))
            .collect();
        format!(
            "SELECT {} as {}, {} as {} FROM (VALUES {}) {} dates (date_from, date_to)",
            self.date_time_cast("date_from"),
            self.escape_column_name("date_from"),
            self.date_time_cast("date_to"),
            self.escape_column_name("date_to"),
            values.join(", "),
            self.as_syntax_table()
        )
    }

    /// `GROUP BY` over the projected dimension expressions. The default
    /// renders ordinal positions; dialects without ordinal grouping
    /// repeat the expressions.
    fn group_by_clause(&self, expressions: &[String]) -> String {
        if expressions.is_empty() {
            return String::new();
        }
        let ordinals: Vec<String> = (1..=expressions.len()).map(|i| i.to_string()).collect();
        format!(" GROUP BY {}", ordinals.join(", "))
    }

    /// Coerce a boolean segment expression for use in a SELECT list.
    fn wrap_segment_for_dimension_select(&self, sql: &str) -> String {
        sql.to_string()
    }

    fn time_range_filter(&self, dimension_sql: &str, from: &str, to: &str) -> String {
        format!("{} >= {} AND {} <= {}", dimension_sql, from, dimension_sql, to)
    }

    fn time_not_in_range_filter(&self, dimension_sql: &str, from: &str, to: &str) -> String {
        format!("{} < {} OR {} > {}", dimension_sql, from, dimension_sql, to)
    }

    fn before_date_filter(&self, dimension_sql: &str, param: &str) -> String {
        format!("{} < {}", dimension_sql, param)
    }

    fn after_date_filter(&self, dimension_sql: &str, param: &str) -> String {
        format!("{} > {}", dimension_sql, param)
    }

    fn concat_strings(&self, strings: &[String]) -> String {
        strings.join(" || ")
    }

    /// `AS` keyword between a derived table and its alias.
    fn as_syntax_table(&self) -> &'static str {
        "AS"
    }

    /// `AS` keyword between a joined relation and its alias.
    fn as_syntax_join(&self) -> &'static str {
        "AS"
    }

    fn now_timestamp_sql(&self) -> String {
        "NOW()".to_string()
    }

    fn unix_timestamp_sql(&self) -> String {
        format!("EXTRACT(EPOCH FROM {})", self.now_timestamp_sql())
    }
}
