use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PolysqlError, PolysqlResult};
use crate::time::Granularity;

const SERIES_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// An ordered, finite sequence of (bucket_start, bucket_end) pairs
/// covering a date range at a granularity.
///
/// Bucket ends are one millisecond before the next bucket start, so a
/// `BETWEEN date_from AND date_to` join condition never double-counts a
/// row. Dialects consume the series through
/// [`series_sql`](crate::dialect::SqlGenerator::series_sql) to build the
/// derived table used for gap-filling LEFT JOINs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries {
    granularity: Granularity,
    buckets: Vec<(String, String)>,
}

impl TimeSeries {
    /// Build the series covering `[from, to]` at `granularity`.
    ///
    /// `from` and `to` accept `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS[.mmm]`;
    /// a date-only `to` is widened to the end of its day. The first
    /// bucket starts at `from` truncated to the granularity.
    pub fn build(granularity: Granularity, from: &str, to: &str) -> PolysqlResult<TimeSeries> {
        let from = parse_date_time(from, false)?;
        let to = parse_date_time(to, true)?;
        if from > to {
            return Err(PolysqlError::programming(format!(
                "Date range is reversed: {} > {}",
                from, to
            )));
        }

        let mut buckets = Vec::new();
        let mut start = truncate(from, granularity);
        while start <= to {
            let next = step(start, granularity);
            let end = next - Duration::milliseconds(1);
            buckets.push((
                start.format(SERIES_FORMAT).to_string(),
                end.format(SERIES_FORMAT).to_string(),
            ));
            start = next;
        }

        Ok(TimeSeries {
            granularity,
            buckets,
        })
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// The (date_from, date_to) pairs, in order.
    pub fn buckets(&self) -> &[(String, String)] {
        &self.buckets
    }
}

fn parse_date_time(value: &str, end_of_day: bool) -> PolysqlResult<NaiveDateTime> {
    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, SERIES_FORMAT) {
        return Ok(date_time);
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(date_time);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let date_time = if end_of_day {
            date.and_hms_milli_opt(23, 59, 59, 999)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        if let Some(date_time) = date_time {
            return Ok(date_time);
        }
    }
    Err(PolysqlError::programming(format!(
        "Unparseable date: '{}'",
        value
    )))
}

/// Truncate to the start of the granularity bucket. Weeks start on Monday.
fn truncate(date_time: NaiveDateTime, granularity: Granularity) -> NaiveDateTime {
    let date = date_time.date();
    let time = date_time.time();
    match granularity {
        Granularity::Second => date
            .and_hms_opt(time.hour(), time.minute(), time.second())
            .unwrap(),
        Granularity::Minute => date.and_hms_opt(time.hour(), time.minute(), 0).unwrap(),
        Granularity::Hour => date.and_hms_opt(time.hour(), 0, 0).unwrap(),
        Granularity::Day => date.and_hms_opt(0, 0, 0).unwrap(),
        Granularity::Week => date
            .week(Weekday::Mon)
            .first_day()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        Granularity::Month => first_of_month(date.year(), date.month()),
        Granularity::Quarter => first_of_month(date.year(), (date.month0() / 3) * 3 + 1),
        Granularity::Year => first_of_month(date.year(), 1),
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}

fn step(start: NaiveDateTime, granularity: Granularity) -> NaiveDateTime {
    match granularity {
        Granularity::Second => start + Duration::seconds(1),
        Granularity::Minute => start + Duration::minutes(1),
        Granularity::Hour => start + Duration::hours(1),
        Granularity::Day => start + Duration::days(1),
        Granularity::Week => start + Duration::weeks(1),
        Granularity::Month => start + Months::new(1),
        Granularity::Quarter => start + Months::new(3),
        Granularity::Year => start + Months::new(12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_series() {
        let series = TimeSeries::build(Granularity::Day, "2017-01-01", "2017-01-03").unwrap();
        assert_eq!(
            series.buckets(),
            &[
                (
                    "2017-01-01T00:00:00.000".to_string(),
                    "2017-01-01T23:59:59.999".to_string()
                ),
                (
                    "2017-01-02T00:00:00.000".to_string(),
                    "2017-01-02T23:59:59.999".to_string()
                ),
                (
                    "2017-01-03T00:00:00.000".to_string(),
                    "2017-01-03T23:59:59.999".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_week_series_aligns_to_monday() {
        // 2017-01-05 is a Thursday; the covering week starts on the 2nd.
        let series = TimeSeries::build(Granularity::Week, "2017-01-05", "2017-01-05").unwrap();
        assert_eq!(series.buckets().len(), 1);
        assert_eq!(series.buckets()[0].0, "2017-01-02T00:00:00.000");
        assert_eq!(series.buckets()[0].1, "2017-01-08T23:59:59.999");
    }

    #[test]
    fn test_month_series_spans_year_boundary() {
        let series = TimeSeries::build(Granularity::Month, "2016-11-15", "2017-01-15").unwrap();
        let starts: Vec<&str> = series.buckets().iter().map(|b| b.0.as_str()).collect();
        assert_eq!(
            starts,
            vec![
                "2016-11-01T00:00:00.000",
                "2016-12-01T00:00:00.000",
                "2017-01-01T00:00:00.000"
            ]
        );
    }

    #[test]
    fn test_quarter_series() {
        let series = TimeSeries::build(Granularity::Quarter, "2017-02-01", "2017-08-01").unwrap();
        let starts: Vec<&str> = series.buckets().iter().map(|b| b.0.as_str()).collect();
        assert_eq!(
            starts,
            vec![
                "2017-01-01T00:00:00.000",
                "2017-04-01T00:00:00.000",
                "2017-07-01T00:00:00.000"
            ]
        );
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let err = TimeSeries::build(Granularity::Day, "2017-01-03", "2017-01-01").unwrap_err();
        assert!(err.to_string().contains("reversed"));
    }
}
