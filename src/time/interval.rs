use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PolysqlError, PolysqlResult};
use crate::time::Granularity;

/// Whether an interval is measured on the calendar or on the clock.
///
/// Week counts as a clock unit: it is always exactly 604800 seconds,
/// unlike months and years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalScale {
    Calendar,
    Clock,
}

/// A parsed SQL interval string such as `"2 years 3 months"`.
///
/// Unit order is fixed: year, quarter, month, week, day, hour, minute,
/// second. Dialects without mixed-unit interval literals apply the
/// decomposed units one step at a time in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlInterval {
    pub years: u32,
    pub quarters: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl SqlInterval {
    /// Parse an interval string like `"1 month"` or `"2 years 3 days"`.
    pub fn parse(interval: &str) -> PolysqlResult<SqlInterval> {
        let re =
            Regex::new(r"(\d+)\s+(year|quarter|month|week|day|hour|minute|second)s?\s*").unwrap();

        let mut parsed = SqlInterval::default();
        let mut matched_len = 0;
        for capture in re.captures_iter(interval.trim()) {
            let amount: u32 = capture[1].parse().map_err(|_| {
                PolysqlError::programming(format!("Invalid interval: '{}'", interval))
            })?;
            match &capture[2] {
                "year" => parsed.years = amount,
                "quarter" => parsed.quarters = amount,
                "month" => parsed.months = amount,
                "week" => parsed.weeks = amount,
                "day" => parsed.days = amount,
                "hour" => parsed.hours = amount,
                "minute" => parsed.minutes = amount,
                "second" => parsed.seconds = amount,
                _ => unreachable!(),
            }
            matched_len += capture[0].len();
        }

        if matched_len != interval.trim().len() || parsed.units().is_empty() {
            return Err(PolysqlError::programming(format!(
                "Invalid interval: '{}'",
                interval
            )));
        }
        Ok(parsed)
    }

    /// Non-zero (amount, unit) pairs in the fixed decomposition order.
    pub fn units(&self) -> Vec<(u32, Granularity)> {
        [
            (self.years, Granularity::Year),
            (self.quarters, Granularity::Quarter),
            (self.months, Granularity::Month),
            (self.weeks, Granularity::Week),
            (self.days, Granularity::Day),
            (self.hours, Granularity::Hour),
            (self.minutes, Granularity::Minute),
            (self.seconds, Granularity::Second),
        ]
        .into_iter()
        .filter(|(amount, _)| *amount > 0)
        .collect()
    }

    /// Calendar or clock scale, `None` when units of both scales are mixed.
    pub fn classify(&self) -> Option<IntervalScale> {
        let calendar = self.years > 0 || self.quarters > 0 || self.months > 0;
        let clock = self.weeks > 0
            || self.days > 0
            || self.hours > 0
            || self.minutes > 0
            || self.seconds > 0;
        match (calendar, clock) {
            (true, true) => None,
            (true, false) => Some(IntervalScale::Calendar),
            _ => Some(IntervalScale::Clock),
        }
    }

    /// Total width in months. Only meaningful for calendar-scale intervals.
    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.quarters * 3 + self.months
    }

    /// Total width in seconds. Only meaningful for clock-scale intervals.
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.weeks) * 604800
            + u64::from(self.days) * 86400
            + u64::from(self.hours) * 3600
            + u64::from(self.minutes) * 60
            + u64::from(self.seconds)
    }
}

impl std::fmt::Display for SqlInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .units()
            .into_iter()
            .map(|(amount, unit)| {
                if amount == 1 {
                    format!("{} {}", amount, unit)
                } else {
                    format!("{} {}s", amount, unit)
                }
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

impl std::str::FromStr for SqlInterval {
    type Err = PolysqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SqlInterval::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_unit() {
        let interval = SqlInterval::parse("1 month").unwrap();
        assert_eq!(interval.months, 1);
        assert_eq!(interval.classify(), Some(IntervalScale::Calendar));
        assert_eq!(interval.total_months(), 1);
    }

    #[test]
    fn test_parse_multi_unit() {
        let interval = SqlInterval::parse("2 years 3 months").unwrap();
        assert_eq!(interval.total_months(), 27);
        assert_eq!(interval.to_string(), "2 years 3 months");
    }

    #[test]
    fn test_mixed_scales_classify_as_none() {
        let interval = SqlInterval::parse("1 month 3 days").unwrap();
        assert_eq!(interval.classify(), None);
    }

    #[test]
    fn test_clock_seconds() {
        let interval = SqlInterval::parse("1 week 2 days").unwrap();
        assert_eq!(interval.classify(), Some(IntervalScale::Clock));
        assert_eq!(interval.total_seconds(), 604800 + 2 * 86400);
    }

    #[test]
    fn test_invalid_interval() {
        assert!(SqlInterval::parse("three days").is_err());
        assert!(SqlInterval::parse("").is_err());
        assert!(SqlInterval::parse("1 fortnight").is_err());
    }
}
