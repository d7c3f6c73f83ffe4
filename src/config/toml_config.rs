use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{validate_aws_region, validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Optional settings file:
///
/// ```toml
/// [aws]
/// region = "us-east-1"
///
/// [slack.channels]
/// billing = "${BILLING_WEBHOOK}"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub slack: SlackConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackConfig {
    /// channel name → incoming webhook URL
    #[serde(default)]
    pub channels: BTreeMap<String, String>,
}

impl ReportConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${BILLING_WEBHOOK})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        if let Some(region) = &self.aws.region {
            validate_aws_region("aws.region", region)?;
        }

        // webhook URL 只在 --slack 用到該頻道時才驗證
        for name in self.slack.channels.keys() {
            validate_non_empty_string("slack.channels", name)?;
        }

        tracing::debug!(
            "Configuration validated ({} Slack channel(s))",
            self.slack.channels.len()
        );
        Ok(())
    }
}
