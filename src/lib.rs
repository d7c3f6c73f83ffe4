pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::{LambdaConfig, WebhookSecret};

pub use adapters::{CostExplorerSource, FixedClock, SlackWebhook, SystemClock};
pub use config::ReportConfig;
pub use crate::core::{
    engine::{ReportEngine, ReportOutcome},
    resolver::{resolve, resolve_with_channels, RawArgs},
};
pub use utils::error::{ReportError, Result};
