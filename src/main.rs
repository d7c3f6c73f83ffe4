use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use dontspendtoomuch::core::formatter::JsonFormatter;
use dontspendtoomuch::core::resolver::{resolve_range, resolve_targets};
use dontspendtoomuch::domain::model::ReportRequest;
use dontspendtoomuch::domain::ports::{Clock, ReportFormatter};
use dontspendtoomuch::utils::error::{ReportError, Result};
use dontspendtoomuch::utils::{logger, validation::Validate};
use dontspendtoomuch::{
    CliConfig, CostExplorerSource, ReportConfig, ReportEngine, SlackWebhook, SystemClock,
};
use std::path::Path;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    let (request, config) = match build_request(&cli, &SystemClock) {
        Ok(built) => built,
        Err(e) => fail(e),
    };

    let region = cli.region.clone().or(config.aws.region.clone());
    let source = CostExplorerSource::from_env(region).await;
    let notifier = SlackWebhook::new()?;
    let engine = ReportEngine::new(source, notifier);

    let outcome = match engine.run(&request).await {
        Ok(outcome) => outcome,
        Err(e) => fail(e),
    };

    let output = if cli.json {
        match JsonFormatter.format(&outcome.spend) {
            Ok(output) => output,
            Err(e) => fail(e),
        }
    } else {
        outcome.table.clone()
    };
    println!("{}", output.trim_end());

    if let Some(e) = outcome.delivery_error() {
        fail(e);
    }

    Ok(())
}

/// Email and range checks run before `--config` is read; the config is
/// only consulted to turn `--slack` channel names into webhook URLs.
fn build_request(cli: &CliConfig, clock: &dyn Clock) -> Result<(ReportRequest, ReportConfig)> {
    let raw = cli.raw_args();

    // 驗證參數: 任何 I/O 之前
    let range = resolve_range(&raw, clock)?;

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ReportConfig::default(),
    };
    let notify_targets = resolve_targets(&raw, &config.slack.channels)?;

    tracing::debug!(
        "Resolved range {} with {} notification target(s)",
        range,
        notify_targets.len()
    );

    Ok((
        ReportRequest {
            range,
            notify_targets,
        },
        config,
    ))
}

fn load_config(path: &Path) -> Result<ReportConfig> {
    tracing::debug!("Loading configuration from {}", path.display());
    let config = ReportConfig::from_file(path)?;
    config.validate()?;
    Ok(config)
}

/// Argument-parser convention: usage on stderr, exit status 2.
fn usage_error(e: ReportError) -> ! {
    tracing::debug!("Usage error: {:?}", e);
    let kind = match e {
        ReportError::ConflictingRange => ErrorKind::ArgumentConflict,
        ReportError::MissingRange | ReportError::UnpairedDate { .. } => {
            ErrorKind::MissingRequiredArgument
        }
        _ => ErrorKind::ValueValidation,
    };
    CliConfig::command().error(kind, e.to_string()).exit()
}

fn fail(e: ReportError) -> ! {
    if e.is_usage_error() {
        usage_error(e);
    }

    tracing::error!(
        "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}
