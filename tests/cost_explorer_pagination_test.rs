use anyhow::Result;
use aws_sdk_costexplorer::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_costexplorer::Client as CostExplorerClient;
use chrono::NaiveDate;
use dontspendtoomuch::domain::model::DateRange;
use dontspendtoomuch::domain::ports::CostSource;
use dontspendtoomuch::CostExplorerSource;
use httpmock::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

const GET_COST_AND_USAGE: &str = "AWSInsightsIndexService.GetCostAndUsage";

fn source_for(server: &MockServer) -> CostExplorerSource {
    let config = aws_sdk_costexplorer::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "SECRETTEST", None, None, "test"))
        .endpoint_url(server.base_url())
        .build();
    CostExplorerSource::new(CostExplorerClient::from_conf(config))
}

fn page(days: &[(&str, &str, &str)], next_page_token: Option<&str>) -> serde_json::Value {
    let results: Vec<serde_json::Value> = days
        .iter()
        .map(|(start, end, amount)| {
            serde_json::json!({
                "TimePeriod": { "Start": start, "End": end },
                "Total": { "UnblendedCost": { "Amount": amount, "Unit": "USD" } },
                "Estimated": false
            })
        })
        .collect();

    let mut body = serde_json::json!({ "ResultsByTime": results });
    if let Some(token) = next_page_token {
        body["NextPageToken"] = serde_json::json!(token);
    }
    body
}

fn has_page_token(req: &HttpMockRequest) -> bool {
    req.body
        .as_deref()
        .map(|body| String::from_utf8_lossy(body).contains("NextPageToken"))
        .unwrap_or(false)
}

#[tokio::test]
async fn test_pages_are_followed_and_concatenated_in_order() -> Result<()> {
    let server = MockServer::start_async().await;

    let second_page = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .header("x-amz-target", GET_COST_AND_USAGE)
                .json_body_partial(r#"{ "NextPageToken": "page-2" }"#);
            then.status(200)
                .header("content-type", "application/x-amz-json-1.1")
                .json_body(page(&[("2020-05-03", "2020-05-04", "3.00")], None));
        })
        .await;

    let first_page = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .header("x-amz-target", GET_COST_AND_USAGE)
                .matches(|req| !has_page_token(req));
            then.status(200)
                .header("content-type", "application/x-amz-json-1.1")
                .json_body(page(
                    &[
                        ("2020-05-01", "2020-05-02", "1.23"),
                        ("2020-05-02", "2020-05-03", "0.0456"),
                    ],
                    Some("page-2"),
                ));
        })
        .await;

    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
        NaiveDate::from_ymd_opt(2020, 5, 4).unwrap(),
    )
    .unwrap();
    let spend = source_for(&server).fetch_daily_spend(&range).await?;

    first_page.assert_async().await;
    second_page.assert_async().await;

    let days: Vec<String> = spend.iter().map(|e| e.date.to_string()).collect();
    assert_eq!(days, ["2020-05-01", "2020-05-02", "2020-05-03"]);
    assert_eq!(spend[0].amount, Decimal::from_str("1.23")?);
    assert_eq!(spend[1].amount, Decimal::from_str("0.0456")?);
    assert_eq!(spend[2].amount, Decimal::from_str("3.00")?);
    assert!(spend.iter().all(|e| e.unit == "USD"));
    Ok(())
}

#[tokio::test]
async fn test_api_failure_is_an_integration_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(400)
                .header("content-type", "application/x-amz-json-1.1")
                .json_body(serde_json::json!({
                    "__type": "DataUnavailableException",
                    "message": "no data"
                }));
        })
        .await;

    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
        NaiveDate::from_ymd_opt(2020, 5, 2).unwrap(),
    )
    .unwrap();
    let err = source_for(&server)
        .fetch_daily_spend(&range)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        dontspendtoomuch::ReportError::CostApiError { .. }
    ));
    assert!(!err.is_usage_error());
}
