use dontspendtoomuch::utils::{logger, validation::Validate};
use dontspendtoomuch::{
    resolve_with_channels, CostExplorerSource, LambdaConfig, RawArgs, ReportEngine, SlackWebhook,
    SystemClock, WebhookSecret,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

/// Scheduled events usually carry no payload; both fields override the environment.
#[derive(Debug, Default, Deserialize)]
pub struct Request {
    pub n_days: Option<i64>,
    /// Restrict delivery to these channels from the secret.
    pub channels: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub start: String,
    pub end: String,
    pub days: usize,
    pub delivered: usize,
    pub report: String,
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting spend report Lambda function");

    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    let aws_config = {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &lambda_config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        loader.load().await
    };

    let secrets = WebhookSecret::new(aws_sdk_secretsmanager::Client::new(&aws_config));
    let channels = secrets.channels(&lambda_config.webhooks_secret).await?;

    let slack = match event.payload.channels {
        Some(requested) => requested,
        None => channels.keys().cloned().collect(),
    };
    let raw = RawArgs {
        n_days: Some(event.payload.n_days.unwrap_or(lambda_config.report_n_days)),
        slack,
        ..Default::default()
    };
    let request = resolve_with_channels(&raw, &SystemClock, &channels)?;

    let source = CostExplorerSource::new(aws_sdk_costexplorer::Client::new(&aws_config));
    let engine = ReportEngine::new(source, SlackWebhook::new()?);
    let outcome = engine.run(&request).await?;

    if let Some(e) = outcome.delivery_error() {
        tracing::error!("{}", e);
        return Err(e.into());
    }

    tracing::info!("Spend report sent to {} channel(s)", outcome.delivered);
    Ok(Response {
        message: "Spend report completed successfully".to_string(),
        start: request.range.start_str(),
        end: request.range.end_str(),
        days: outcome.spend.len(),
        delivered: outcome.delivered,
        report: outcome.table,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
