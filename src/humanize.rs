//! Human-readable durations.
//!
//! Unit labels come from a caller-supplied function so that pluralization and
//! translation stay outside of this crate. [`english`] is the label set the daemon uses.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Hour,
    Minute,
}

/// Renders `duration_seconds` as days, hours and minutes, skipping every zero part.
///
/// Seconds are dropped, so anything under a minute renders as an empty string.
pub fn humanize<F>(duration_seconds: i64, label: F) -> String
where
    F: Fn(TimeUnit, u64) -> String,
{
    let minutes = duration_seconds.max(0).unsigned_abs() / 60;
    let parts = [
        (TimeUnit::Day, minutes / 1440),
        (TimeUnit::Hour, (minutes / 60) % 24),
        (TimeUnit::Minute, minutes % 60),
    ];

    parts
        .into_iter()
        .filter(|&(_, value)| value > 0)
        .map(|(unit, value)| format!("{value} {}", label(unit, value)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a probe interval given in minutes, e.g. `5 minutes`.
pub fn interval<F>(minutes: u64, label: F) -> String
where
    F: Fn(TimeUnit, u64) -> String,
{
    format!("{minutes} {}", label(TimeUnit::Minute, minutes))
}

pub fn english(unit: TimeUnit, quantity: u64) -> String {
    let singular = match unit {
        TimeUnit::Day => "day",
        TimeUnit::Hour => "hour",
        TimeUnit::Minute => "minute",
    };
    if quantity == 1 {
        singular.to_string()
    } else {
        format!("{singular}s")
    }
}
