//! Display-date handling for fields migrated between representations.
//!
//! Older documents store dates as plain strings, newer ones as native
//! timestamps. Neither form is authoritative, so both are accepted.

use chrono::{DateTime, Utc};
use firestore_rest::Value;

/// Short numeric date, the shape the dashboard has always rendered.
pub fn format_short_date(ts: &DateTime<Utc>) -> String {
    ts.format("%-m/%-d/%Y").to_string()
}

/// Native timestamps are formatted, stored strings pass through unchanged,
/// anything else (including an absent field) renders empty.
pub fn display_date(value: Option<&Value>) -> String {
    match value {
        Some(Value::Timestamp(ts)) => format_short_date(ts),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}
