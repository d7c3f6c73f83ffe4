// Adapters layer: concrete implementations for external systems (clock, AWS, Slack).

pub mod clock;
pub mod cost_explorer;
pub mod slack;

pub use clock::{FixedClock, SystemClock};
pub use cost_explorer::CostExplorerSource;
pub use slack::SlackWebhook;
