use crate::domain::model::{DailySpend, DateRange};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use url::Url;

/// Source of "today". Injected so range resolution is deterministic.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[async_trait]
pub trait CostSource: Send + Sync {
    async fn fetch_daily_spend(&self, range: &DateRange) -> Result<DailySpend>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, target: &Url, message: &str) -> Result<()>;
}

pub trait ReportFormatter: Send + Sync {
    fn format(&self, spend: &DailySpend) -> Result<String>;
}
