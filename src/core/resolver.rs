//! Turns raw command-line input into a validated [`ReportRequest`].
//!
//! Rules are checked in a fixed order and the first failure wins:
//!
//! 1. any email target is refused outright
//! 2. exactly one of `--n-days` or the `--start`/`--end` pair
//! 3. `--start` and `--end` come together
//! 4. both dates parse as `YYYY-MM-DD`, and `--start` is not after `--end`
//! 5. every Slack target is a webhook URL or a known channel name
//!
//! Rules 1-4 live in [`resolve_range`] and rule 5 in [`resolve_targets`], so
//! a caller can load its channel map between the two.
//!
//! Nothing here performs I/O; "today" comes from the injected [`Clock`].

use crate::domain::model::{DateRange, NotifyTarget, RangeSpec, ReportRequest};
use crate::domain::ports::Clock;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{parse_aws_date, validate_url};
use chrono::Days;
use std::collections::BTreeMap;
use url::Url;

/// Unvalidated arguments, shaped like the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArgs {
    pub n_days: Option<i64>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub slack: Vec<String>,
    pub email: Vec<String>,
}

pub fn resolve(raw: &RawArgs, clock: &dyn Clock) -> Result<ReportRequest> {
    resolve_with_channels(raw, clock, &BTreeMap::new())
}

/// Like [`resolve`], but `--slack` may also name a channel from `channels`
/// (channel name → webhook URL).
pub fn resolve_with_channels(
    raw: &RawArgs,
    clock: &dyn Clock,
    channels: &BTreeMap<String, String>,
) -> Result<ReportRequest> {
    let range = resolve_range(raw, clock)?;
    let notify_targets = resolve_targets(raw, channels)?;

    tracing::debug!(
        "Resolved range {} with {} notification target(s)",
        range,
        notify_targets.len()
    );

    Ok(ReportRequest {
        range,
        notify_targets,
    })
}

/// Every check that needs neither a config file nor a channel map:
/// email refusal, then the range rules.
pub fn resolve_range(raw: &RawArgs, clock: &dyn Clock) -> Result<DateRange> {
    webhook_urls(email_targets(raw))?;

    let spec = parse_range_spec(raw)?;
    range_from_spec(&spec, clock)
}

/// Webhook URLs for `--slack`, looked up in `channels` first.
pub fn resolve_targets(raw: &RawArgs, channels: &BTreeMap<String, String>) -> Result<Vec<Url>> {
    let mut targets = email_targets(raw);
    for target in &raw.slack {
        targets.push(NotifyTarget::Slack(slack_target(target, channels)?));
    }
    webhook_urls(targets)
}

pub fn parse_range_spec(raw: &RawArgs) -> Result<RangeSpec> {
    match (raw.n_days, raw.start.as_deref(), raw.end.as_deref()) {
        (None, None, None) => Err(ReportError::MissingRange),
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ReportError::ConflictingRange),
        (Some(n), None, None) => match u32::try_from(n) {
            Ok(n_days) if n_days > 0 => Ok(RangeSpec::Relative { n_days }),
            _ => Err(ReportError::InvalidDayCount { value: n }),
        },
        (None, None, Some(_)) => Err(ReportError::UnpairedDate {
            given: "end",
            missing: "start",
        }),
        (None, Some(_), None) => Err(ReportError::UnpairedDate {
            given: "start",
            missing: "end",
        }),
        (None, Some(start), Some(end)) => {
            let start = parse_aws_date("start", start)?;
            let end = parse_aws_date("end", end)?;
            Ok(RangeSpec::Absolute { start, end })
        }
    }
}

pub fn range_from_spec(spec: &RangeSpec, clock: &dyn Clock) -> Result<DateRange> {
    match *spec {
        RangeSpec::Relative { n_days } => {
            let today = clock.today();
            let start = today
                .checked_sub_days(Days::new(u64::from(n_days)))
                .ok_or(ReportError::InvalidDayCount {
                    value: i64::from(n_days),
                })?;
            DateRange::new(start, today).ok_or(ReportError::InvalidDayCount {
                value: i64::from(n_days),
            })
        }
        RangeSpec::Absolute { start, end } => {
            DateRange::new(start, end).ok_or_else(|| ReportError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            })
        }
    }
}

fn email_targets(raw: &RawArgs) -> Vec<NotifyTarget> {
    raw.email.iter().cloned().map(NotifyTarget::Email).collect()
}

/// Deduplicated webhook URLs, in the order given. Email has no delivery path.
pub fn webhook_urls(targets: Vec<NotifyTarget>) -> Result<Vec<Url>> {
    let mut urls: Vec<Url> = Vec::new();
    for target in targets {
        match target {
            NotifyTarget::Slack(url) => {
                if !urls.contains(&url) {
                    urls.push(url);
                }
            }
            NotifyTarget::Email(_) => {
                return Err(ReportError::Unimplemented { feature: "email" });
            }
        }
    }
    Ok(urls)
}

fn slack_target(target: &str, channels: &BTreeMap<String, String>) -> Result<Url> {
    let (value, from_channel) = match channels.get(target) {
        Some(url) => (url.as_str(), true),
        None => (target, false),
    };

    validate_url("slack", value).map_err(|e| {
        let reason = match e {
            ReportError::InvalidConfigValueError { reason, .. } => reason,
            other => other.to_string(),
        };
        ReportError::InvalidTarget {
            field: "slack",
            value: target.to_string(),
            reason: if from_channel {
                format!("channel webhook is invalid: {}", reason)
            } else if channels.is_empty() {
                reason
            } else {
                format!("not a webhook URL or known channel: {}", reason)
            },
        }
    })
}
