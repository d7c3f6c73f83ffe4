use crate::domain::ports::Notifier;
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts `{"text": ...}` to Slack incoming webhooks. No retries.
#[derive(Debug, Clone)]
pub struct SlackWebhook {
    client: Client,
}

impl SlackWebhook {
    pub fn new() -> Result<Self> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SlackWebhook {
    async fn notify(&self, target: &Url, message: &str) -> Result<()> {
        tracing::debug!("Posting report to {}", target.host_str().unwrap_or("webhook"));

        let response = self
            .client
            .post(target.clone())
            .json(&serde_json::json!({ "text": message }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::WebhookRejected {
                target: target.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
