use crate::domain::model::{DailySpend, DateRange, SpendEntry};
use crate::domain::ports::CostSource;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::parse_aws_date;
use async_trait::async_trait;
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::types::{DateInterval, Granularity, ResultByTime};
use aws_sdk_costexplorer::Client as CostExplorerClient;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const UNBLENDED_COST: &str = "UnblendedCost";

/// Daily unblended cost from AWS Cost Explorer (`GetCostAndUsage`).
#[derive(Debug, Clone)]
pub struct CostExplorerSource {
    client: CostExplorerClient,
}

impl CostExplorerSource {
    pub fn new(client: CostExplorerClient) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS credential chain.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;
        Self::new(CostExplorerClient::new(&config))
    }
}

#[async_trait]
impl CostSource for CostExplorerSource {
    async fn fetch_daily_spend(&self, range: &DateRange) -> Result<DailySpend> {
        let period = DateInterval::builder()
            .start(range.start_str())
            .end(range.end_str())
            .build()
            .map_err(|e| ReportError::CostApiError {
                message: e.to_string(),
            })?;

        let mut spend = Vec::new();
        let mut next_page_token: Option<String> = None;

        loop {
            tracing::debug!("Requesting cost and usage for {}", range);
            let output = self
                .client
                .get_cost_and_usage()
                .time_period(period.clone())
                .granularity(Granularity::Daily)
                .metrics(UNBLENDED_COST)
                .set_next_page_token(next_page_token.take())
                .send()
                .await
                .map_err(|e| ReportError::CostApiError {
                    message: DisplayErrorContext(&e).to_string(),
                })?;

            spend.extend(spend_from_results(output.results_by_time())?);

            match output.next_page_token() {
                Some(token) if !token.is_empty() => next_page_token = Some(token.to_string()),
                _ => break,
            }
        }

        tracing::info!("Fetched {} day(s) of spend", spend.len());
        Ok(spend)
    }
}

/// Converts Cost Explorer results into entries, keeping their order.
/// A day without an `UnblendedCost` total counts as zero.
pub fn spend_from_results(results: &[ResultByTime]) -> Result<DailySpend> {
    results
        .iter()
        .map(|result| {
            let start = result
                .time_period()
                .map(|period| period.start())
                .ok_or_else(|| ReportError::CostApiError {
                    message: "result is missing its time period".to_string(),
                })?;
            let date = parse_aws_date("start", start).map_err(|_| ReportError::CostApiError {
                message: format!("unexpected date in response: '{}'", start),
            })?;

            let metric = result.total().and_then(|total| total.get(UNBLENDED_COST));
            let amount = match metric.and_then(|m| m.amount()) {
                Some(raw) => Decimal::from_str(raw).map_err(|e| ReportError::CostApiError {
                    message: format!("unexpected amount '{}' for {}: {}", raw, start, e),
                })?,
                None => Decimal::ZERO,
            };
            let unit = metric
                .and_then(|m| m.unit())
                .unwrap_or("USD")
                .to_string();

            Ok(SpendEntry { date, amount, unit })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_costexplorer::types::MetricValue;
    use chrono::NaiveDate;

    fn day(start: &str, end: &str, amount: Option<&str>) -> ResultByTime {
        let period = DateInterval::builder().start(start).end(end).build().unwrap();
        let builder = ResultByTime::builder().time_period(period);
        match amount {
            Some(amount) => builder
                .total(
                    UNBLENDED_COST,
                    MetricValue::builder().amount(amount).unit("USD").build(),
                )
                .build(),
            None => builder.build(),
        }
    }

    #[test]
    fn test_results_keep_order_and_exact_amounts() {
        let results = vec![
            day("2020-05-01", "2020-05-02", Some("1.23")),
            day("2020-05-02", "2020-05-03", Some("4.5600000001")),
        ];
        let spend = spend_from_results(&results).unwrap();

        assert_eq!(spend.len(), 2);
        assert_eq!(spend[0].date, NaiveDate::from_ymd_opt(2020, 5, 1).unwrap());
        assert_eq!(spend[0].amount.to_string(), "1.23");
        assert_eq!(spend[1].amount.to_string(), "4.5600000001");
        assert_eq!(spend[1].unit, "USD");
    }

    #[test]
    fn test_missing_total_counts_as_zero() {
        let spend = spend_from_results(&[day("2020-05-01", "2020-05-02", None)]).unwrap();
        assert_eq!(spend[0].amount, Decimal::ZERO);
    }

    #[test]
    fn test_garbage_amount_is_an_integration_error() {
        let err = spend_from_results(&[day("2020-05-01", "2020-05-02", Some("lots"))]).unwrap_err();
        assert!(matches!(err, ReportError::CostApiError { .. }));
    }
}
