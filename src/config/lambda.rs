use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{validate_aws_region, validate_non_empty_string, validate_range, Validate};
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client as SecretsClient;
use std::collections::BTreeMap;
use std::env;

pub const DEFAULT_REPORT_N_DAYS: i64 = 7;

/// Scheduled variant: every channel in the webhook secret gets the report.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    /// Secret id (name or ARN) holding `{"channel": "https://hooks..."}`.
    pub webhooks_secret: String,
    pub report_n_days: i64,
    pub region: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            webhooks_secret: env::var("SLACK_WEBHOOKS_SECRET").map_err(|_| {
                ReportError::MissingConfigError {
                    field: "SLACK_WEBHOOKS_SECRET".to_string(),
                }
            })?,
            report_n_days: match env::var("REPORT_N_DAYS") {
                Ok(value) => value
                    .parse()
                    .map_err(|_| ReportError::InvalidConfigValueError {
                        field: "REPORT_N_DAYS".to_string(),
                        value,
                        reason: "must be a whole number of days".to_string(),
                    })?,
                Err(_) => DEFAULT_REPORT_N_DAYS,
            },
            region: env::var("AWS_REGION").ok(),
        })
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        // 驗證 secret 名稱
        validate_non_empty_string("SLACK_WEBHOOKS_SECRET", &self.webhooks_secret)?;

        validate_range("REPORT_N_DAYS", self.report_n_days, 1, 366)?;

        if let Some(region) = &self.region {
            validate_aws_region("AWS_REGION", region)?;
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

/// Reads the channel → webhook mapping from Secrets Manager.
#[derive(Debug, Clone)]
pub struct WebhookSecret {
    client: SecretsClient,
}

impl WebhookSecret {
    pub fn new(client: SecretsClient) -> Self {
        Self { client }
    }

    pub async fn channels(&self, secret_id: &str) -> Result<BTreeMap<String, String>> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| ReportError::SecretsApiError {
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let secret = output
            .secret_string()
            .ok_or_else(|| ReportError::SecretsApiError {
                message: format!("secret '{}' has no string value", secret_id),
            })?;

        parse_channel_map(secret)
    }
}

pub fn parse_channel_map(secret: &str) -> Result<BTreeMap<String, String>> {
    let channels: BTreeMap<String, String> =
        serde_json::from_str(secret).map_err(|e| ReportError::ConfigError {
            message: format!("webhook secret must be a JSON object of strings: {}", e),
        })?;
    Ok(channels)
}
