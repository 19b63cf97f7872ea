//! Label formatting helpers.

use chrono::{DateTime, Utc};

/// Format a tick time with a strftime pattern. Patterns are validated in config.
pub fn format_time(time: &DateTime<Utc>, pattern: &str) -> String {
    time.format(pattern).to_string()
}

/// Compact volume/amount label: `千万`, `万` and `k` suffixes with two decimals.
pub fn format_number(value: f64) -> String {
    if value >= 10_000_000.0 {
        format!("{:.2}千万", value / 10_000_000.0)
    } else if value >= 10_000.0 {
        format!("{:.2}万", value / 10_000.0)
    } else if value >= 1_000.0 {
        format!("{:.2}k", value / 1_000.0)
    } else {
        format!("{value:.2}")
    }
}

pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// Signed percentage with two decimals, `--` when unavailable. Zero carries a `+`.
pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(percent) if percent >= 0.0 => format!("+{:.2}%", percent.abs()),
        Some(percent) => format!("{percent:.2}%"),
        None => "--".to_string(),
    }
}

/// Signed price change with two decimals, `--` when unavailable.
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(change) if change >= 0.0 => format!("+{:.2}", change.abs()),
        Some(change) => format!("{change:.2}"),
        None => "--".to_string(),
    }
}
