use crate::core::formatter::{slack_message, TableFormatter};
use crate::domain::model::{DailySpend, ReportRequest};
use crate::domain::ports::{CostSource, Notifier, ReportFormatter};
use crate::utils::error::{ReportError, Result};
use url::Url;

/// Result of one run. The report exists even when some deliveries failed.
#[derive(Debug)]
pub struct ReportOutcome {
    pub spend: DailySpend,
    pub table: String,
    pub delivered: usize,
    pub failed_deliveries: Vec<(Url, ReportError)>,
}

impl ReportOutcome {
    pub fn delivery_error(&self) -> Option<ReportError> {
        if self.failed_deliveries.is_empty() {
            return None;
        }
        Some(ReportError::DeliveryFailed {
            attempted: self.delivered + self.failed_deliveries.len(),
            failed: self
                .failed_deliveries
                .iter()
                .map(|(url, _)| url.to_string())
                .collect(),
        })
    }
}

pub struct ReportEngine<S: CostSource, N: Notifier> {
    source: S,
    notifier: N,
}

impl<S: CostSource, N: Notifier> ReportEngine<S, N> {
    pub fn new(source: S, notifier: N) -> Self {
        Self { source, notifier }
    }

    /// fetch → format → notify. Fetch errors abort the run; delivery
    /// failures are collected so every target is attempted.
    pub async fn run(&self, request: &ReportRequest) -> Result<ReportOutcome> {
        tracing::info!("Fetching spend for {}", request.range);
        let spend = self.source.fetch_daily_spend(&request.range).await?;

        let table = TableFormatter.format(&spend)?;

        let mut delivered = 0;
        let mut failed_deliveries = Vec::new();
        if !request.notify_targets.is_empty() {
            let message = slack_message(&request.range, &table);
            for target in &request.notify_targets {
                match self.notifier.notify(target, &message).await {
                    Ok(()) => {
                        delivered += 1;
                        tracing::info!("Report sent to {}", target.host_str().unwrap_or("webhook"));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to send report to {}: {}", target, e);
                        failed_deliveries.push((target.clone(), e));
                    }
                }
            }
        }

        Ok(ReportOutcome {
            spend,
            table,
            delivered,
            failed_deliveries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DateRange, SpendEntry};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    struct StaticSource;

    #[async_trait]
    impl CostSource for StaticSource {
        async fn fetch_daily_spend(&self, range: &DateRange) -> Result<DailySpend> {
            Ok(vec![SpendEntry {
                date: range.start(),
                amount: Decimal::new(123, 2),
                unit: "USD".to_string(),
            }])
        }
    }

    struct FailingSource;

    #[async_trait]
    impl CostSource for FailingSource {
        async fn fetch_daily_spend(&self, _range: &DateRange) -> Result<DailySpend> {
            Err(ReportError::CostApiError {
                message: "AccessDenied".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
        reject_host: Option<&'static str>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, target: &Url, message: &str) -> Result<()> {
            if target.host_str() == self.reject_host {
                return Err(ReportError::WebhookRejected {
                    target: target.to_string(),
                    status: 404,
                    body: "no_service".to_string(),
                });
            }
            self.sent
                .lock()
                .unwrap()
                .push(format!("{} {}", target, message));
            Ok(())
        }
    }

    fn request(targets: &[&str]) -> ReportRequest {
        ReportRequest {
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
                NaiveDate::from_ymd_opt(2020, 5, 8).unwrap(),
            )
            .unwrap(),
            notify_targets: targets.iter().map(|t| Url::parse(t).unwrap()).collect(),
        }
    }

    #[tokio::test]
    async fn test_run_without_targets() {
        let engine = ReportEngine::new(StaticSource, RecordingNotifier::default());
        let outcome = engine.run(&request(&[])).await.unwrap();

        assert_eq!(outcome.spend.len(), 1);
        assert!(outcome.table.contains("1.23"));
        assert!(outcome.delivery_error().is_none());
        assert!(engine.notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_every_target_is_attempted() {
        let notifier = RecordingNotifier {
            reject_host: Some("broken.example.com"),
            ..Default::default()
        };
        let engine = ReportEngine::new(StaticSource, notifier);
        let outcome = engine
            .run(&request(&[
                "https://broken.example.com/hook",
                "https://hooks.example.com/a",
            ]))
            .await
            .unwrap();

        assert_eq!(outcome.delivered, 1);
        assert_eq!(outcome.failed_deliveries.len(), 1);
        let sent = engine.notifier.sent.lock().unwrap();
        assert!(sent[0].starts_with("https://hooks.example.com/a AWS spend"));

        match outcome.delivery_error() {
            Some(ReportError::DeliveryFailed { attempted, failed }) => {
                assert_eq!(attempted, 2);
                assert_eq!(failed, vec!["https://broken.example.com/hook".to_string()]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_propagated_before_notifying() {
        let engine = ReportEngine::new(FailingSource, RecordingNotifier::default());
        let err = engine
            .run(&request(&["https://hooks.example.com/a"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ReportError::CostApiError { .. }));
        assert!(engine.notifier.sent.lock().unwrap().is_empty());
    }
}
