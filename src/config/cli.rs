use crate::core::resolver::RawArgs;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "dontspendtoomuch")]
#[command(about = "Report on AWS usage")]
pub struct CliConfig {
    /// Email address to send a report to. May be specified multiple times.
    #[arg(long, value_name = "ADDR")]
    pub email: Vec<String>,

    /// Slack webhook URL (or channel name from --config) to send a report to.
    /// May be specified multiple times.
    #[arg(long, value_name = "URL")]
    pub slack: Vec<String>,

    /// Oldest date to include in the report, in YYYY-MM-DD format.
    #[arg(long)]
    pub start: Option<String>,

    /// Newest date to include in the report, in YYYY-MM-DD format.
    #[arg(long)]
    pub end: Option<String>,

    /// Number of days of data to retrieve.
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub n_days: Option<i64>,

    /// Path to a TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// AWS region for the Cost Explorer client
    #[arg(long)]
    pub region: Option<String>,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Empty `--start`/`--end` values count as not given.
    pub fn raw_args(&self) -> RawArgs {
        RawArgs {
            n_days: self.n_days,
            start: self.start.clone().filter(|s| !s.is_empty()),
            end: self.end.clone().filter(|s| !s.is_empty()),
            slack: self.slack.clone(),
            email: self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_flags_into_raw_args() {
        let config = CliConfig::try_parse_from([
            "dontspendtoomuch",
            "--start",
            "2020-04-01",
            "--end",
            "2020-05-01",
            "--slack",
            "https://hooks.example.com/a",
            "--slack",
            "https://hooks.example.com/b",
        ])
        .unwrap();

        let raw = config.raw_args();
        assert_eq!(raw.start.as_deref(), Some("2020-04-01"));
        assert_eq!(raw.end.as_deref(), Some("2020-05-01"));
        assert_eq!(raw.n_days, None);
        assert_eq!(raw.slack.len(), 2);
        assert!(raw.email.is_empty());
    }

    #[test]
    fn test_short_n_days_and_negative_values() {
        let config = CliConfig::try_parse_from(["dontspendtoomuch", "-n", "7"]).unwrap();
        assert_eq!(config.n_days, Some(7));

        let config = CliConfig::try_parse_from(["dontspendtoomuch", "--n-days", "-2"]).unwrap();
        assert_eq!(config.n_days, Some(-2));
    }

    #[test]
    fn test_non_numeric_n_days_is_a_parse_error() {
        assert!(CliConfig::try_parse_from(["dontspendtoomuch", "-n", "week"]).is_err());
    }

    #[test]
    fn test_empty_dates_count_as_absent() {
        let config =
            CliConfig::try_parse_from(["dontspendtoomuch", "--start", "", "--end", "2020-05-01"])
                .unwrap();
        let raw = config.raw_args();
        assert_eq!(raw.start, None);
        assert_eq!(raw.end.as_deref(), Some("2020-05-01"));

        let err = crate::core::resolver::parse_range_spec(&raw).unwrap_err();
        assert!(matches!(
            err,
            crate::utils::error::ReportError::UnpairedDate {
                given: "end",
                missing: "start"
            }
        ));
    }
}
