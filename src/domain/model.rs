use crate::utils::validation::AWS_DATE_FORMAT;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Inclusive-start date window passed to Cost Explorer. `start <= end`
/// holds for every value built through [`DateRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// `YYYY-MM-DD`, the AWS date string style.
    pub fn start_str(&self) -> String {
        self.start.format(AWS_DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(AWS_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start_str(), self.end_str())
    }
}

/// How the caller asked for the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSpec {
    /// Trailing window of `n_days` ending today.
    Relative { n_days: u32 },
    Absolute { start: NaiveDate, end: NaiveDate },
}

/// A place the report may be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyTarget {
    Slack(Url),
    /// Accepted on the command line, never delivered.
    Email(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub range: DateRange,
    pub notify_targets: Vec<Url>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendEntry {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub unit: String,
}

/// Daily spend ordered by date ascending.
pub type DailySpend = Vec<SpendEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_rejects_inverted_dates() {
        assert!(DateRange::new(date(2020, 5, 2), date(2020, 5, 1)).is_none());
        assert!(DateRange::new(date(2020, 5, 1), date(2020, 5, 1)).is_some());
    }

    #[test]
    fn test_date_range_formats_as_aws_dates() {
        let range = DateRange::new(date(2020, 4, 1), date(2020, 5, 1)).unwrap();
        assert_eq!(range.start_str(), "2020-04-01");
        assert_eq!(range.end_str(), "2020-05-01");
        assert_eq!(range.to_string(), "2020-04-01 .. 2020-05-01");
    }
}
