use crate::dialect::templates::{TemplateOp, TemplateSet, BASE_TEMPLATES};
use crate::dialect::traits::{MatchType, SqlGenerator};
use crate::error::{PolysqlError, PolysqlResult};
use crate::time::{Granularity, SqlInterval, TimeSeries};

const ELASTICSEARCH_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("types.string", "KEYWORD"),
    TemplateOp::Set("types.timestamp", "DATETIME"),
    TemplateOp::Delete("functions.PERCENTILECONT"),
    TemplateOp::Delete("functions.STRING_AGG"),
    TemplateOp::Delete("expressions.like_escape"),
    TemplateOp::Delete("types.interval"),
    TemplateOp::Delete("types.binary"),
];

/// The Elasticsearch SQL endpoint. Also serves the `awselasticsearch`
/// registry key (the OpenSearch fork speaks the same SQL surface).
#[derive(Debug)]
pub struct ElasticSearchGenerator {
    templates: TemplateSet,
}

impl ElasticSearchGenerator {
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::resolve(&[BASE_TEMPLATES, ELASTICSEARCH_TEMPLATES]),
        }
    }
}

impl Default for ElasticSearchGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGenerator for ElasticSearchGenerator {
    fn name(&self) -> &'static str {
        "elasticsearch"
    }

    fn sql_templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn time_stamp_cast(&self, value: &str) -> String {
        format!("CAST({} AS DATETIME)", value)
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("CAST({} AS DATETIME)", value)
    }

    fn cast_to_string(&self, sql: &str) -> String {
        format!("CAST({} AS VARCHAR)", sql)
    }

    fn time_grouped_column(
        &self,
        granularity: Granularity,
        column: &str,
    ) -> PolysqlResult<String> {
        match granularity {
            Granularity::Week => Err(PolysqlError::unsupported(self.name(), "Week granularity")),
            Granularity::Quarter => {
                Err(PolysqlError::unsupported(self.name(), "Quarter granularity"))
            }
            other => Ok(format!(
                "HISTOGRAM({}, INTERVAL 1 {})",
                column,
                other.as_str().to_uppercase()
            )),
        }
    }

    fn add_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        let steps: Vec<String> = interval
            .units()
            .into_iter()
            .map(|(amount, unit)| format!("INTERVAL {} {}", amount, unit.as_str().to_uppercase()))
            .collect();
        Ok(format!("{} + {}", date, steps.join(" + ")))
    }

    fn subtract_interval(&self, date: &str, interval: &SqlInterval) -> PolysqlResult<String> {
        let steps: Vec<String> = interval
            .units()
            .into_iter()
            .map(|(amount, unit)| format!("INTERVAL {} {}", amount, unit.as_str().to_uppercase()))
            .collect();
        Ok(format!("{} - {}", date, steps.join(" - ")))
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

    // The SQL endpoint resolves GROUP BY against expressions only
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
