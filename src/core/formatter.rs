use crate::domain::model::{DailySpend, DateRange};
use crate::domain::ports::ReportFormatter;
use crate::utils::error::Result;
use crate::utils::validation::AWS_DATE_FORMAT;
use prettytable::{format, row, Table};

/// Two-column terminal table: `day` and `spend (USD)`, one row per entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableFormatter;

impl ReportFormatter for TableFormatter {
    fn format(&self, spend: &DailySpend) -> Result<String> {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row!["day", "spend (USD)"]);

        for entry in spend {
            table.add_row(row![entry.date.format(AWS_DATE_FORMAT), r->entry.amount]);
        }

        Ok(table.to_string())
    }
}

/// Array of `{date, amount, unit}` objects, amounts as strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, spend: &DailySpend) -> Result<String> {
        Ok(serde_json::to_string_pretty(spend)?)
    }
}

/// Slack message body: a heading plus the table in a code block.
pub fn slack_message(range: &DateRange, table: &str) -> String {
    format!("AWS spend {}\n```\n{}```", range, table)
}
