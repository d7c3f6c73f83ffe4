use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    // 使用錯誤: 在任何外部 I/O 之前回報
    #[error("Either --n-days or --start and --end must be provided.")]
    MissingRange,

    #[error("If --n-days is provided, then --start and --end must be left blank.")]
    ConflictingRange,

    #[error("If --{given} is provided, then --{missing} must be provided too.")]
    UnpairedDate {
        given: &'static str,
        missing: &'static str,
    },

    #[error("--{field} must be in YYYY-MM-DD format (got '{value}')")]
    InvalidDate { field: &'static str, value: String },

    #[error("--start ({start}) must not be after --end ({end})")]
    InvertedRange { start: String, end: String },

    #[error("--n-days must be a positive number of days (got {value})")]
    InvalidDayCount { value: i64 },

    #[error("--{field} target '{value}' is invalid: {reason}")]
    InvalidTarget {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{feature} reports are not yet implemented")]
    Unimplemented { feature: &'static str },

    // 配置錯誤
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // 整合錯誤: 直接傳遞，不重試
    #[error("Cost Explorer request failed: {message}")]
    CostApiError { message: String },

    #[error("Secrets Manager request failed: {message}")]
    SecretsApiError { message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Webhook {target} rejected the message with status {status}: {body}")]
    WebhookRejected {
        target: String,
        status: u16,
        body: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Delivery failed for {} of {attempted} notification target(s): {}", .failed.len(), .failed.join(", "))]
    DeliveryFailed {
        attempted: usize,
        failed: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    Configuration,
    Integration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::MissingRange
            | ReportError::ConflictingRange
            | ReportError::UnpairedDate { .. }
            | ReportError::InvalidDate { .. }
            | ReportError::InvertedRange { .. }
            | ReportError::InvalidDayCount { .. }
            | ReportError::InvalidTarget { .. }
            | ReportError::Unimplemented { .. } => ErrorCategory::Usage,
            ReportError::ConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. }
            | ReportError::TomlError(_)
            | ReportError::IoError(_) => ErrorCategory::Configuration,
            ReportError::CostApiError { .. }
            | ReportError::SecretsApiError { .. }
            | ReportError::HttpError(_)
            | ReportError::WebhookRejected { .. }
            | ReportError::SerializationError(_)
            | ReportError::DeliveryFailed { .. } => ErrorCategory::Integration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Usage => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Integration => match self {
                // 報表已經輸出，只有部分通知失敗
                ReportError::DeliveryFailed { .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Critical,
            },
        }
    }

    pub fn is_usage_error(&self) -> bool {
        self.category() == ErrorCategory::Usage
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Usage => self.to_string(),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Integration => format!("Could not complete the report: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReportError::MissingRange | ReportError::ConflictingRange => {
                "Pass either -n/--n-days, or both --start and --end"
            }
            ReportError::UnpairedDate { .. } => "Pass --start and --end together",
            ReportError::InvalidDate { .. } => "Use dates like 2020-05-01",
            ReportError::InvertedRange { .. } => "Swap --start and --end",
            ReportError::InvalidDayCount { .. } => "Use a day count of 1 or more",
            ReportError::InvalidTarget { .. } => {
                "Pass a webhook URL, or a channel name defined in the config file"
            }
            ReportError::Unimplemented { .. } => "Use --slack instead",
            ReportError::ConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. }
            | ReportError::TomlError(_) => "Check the configuration file and environment variables",
            ReportError::IoError(_) => "Check that the file exists and is readable",
            ReportError::CostApiError { .. } => {
                "Check your AWS credentials and that Cost Explorer is enabled for the account"
            }
            ReportError::SecretsApiError { .. } => {
                "Check that the secret exists and the role may read it"
            }
            ReportError::HttpError(_) | ReportError::WebhookRejected { .. } => {
                "Check the webhook URL and network connectivity"
            }
            ReportError::SerializationError(_) => "Report this as a bug",
            ReportError::DeliveryFailed { .. } => {
                "The report was printed; re-send it to the failed targets"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
