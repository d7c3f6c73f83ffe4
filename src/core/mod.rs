pub mod engine;
pub mod formatter;
pub mod resolver;

pub use crate::domain::model::{DailySpend, DateRange, RangeSpec, ReportRequest, SpendEntry};
pub use crate::domain::ports::{Clock, CostSource, Notifier, ReportFormatter};
pub use crate::utils::error::Result;
