//! Loading tracker JSON and upgrading legacy layouts.
//!
//! Two historical formats are still found in documents:
//! - timestamps stored as Unix seconds (as a number or numeric string)
//! - `subEntries` written as `null` or `[]` on leaves
//!
//! [`upgrade_value`] rewrites both in place and is idempotent.

use chrono::DateTime;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::entry::{Tracker, iso_timestamp};

/// Errors from strict tracker parsing.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid tracker JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses tracker text, returning an empty tracker when it cannot be read.
///
/// Failures are logged and never propagated.
pub fn load_tracker(raw: &str) -> Tracker {
    parse_tracker(raw).unwrap_or_else(|err| {
        tracing::warn!(error = %err, raw, "failed to parse tracker, using an empty one");
        Tracker::default()
    })
}

/// Parses and upgrades tracker text.
///
/// Blank text is an empty tracker.
pub fn parse_tracker(raw: &str) -> Result<Tracker, LoadError> {
    if raw.trim().is_empty() {
        return Ok(Tracker::default());
    }
    let mut value: Value = serde_json::from_str(raw)?;
    upgrade_value(&mut value);
    Ok(serde_json::from_value(value)?)
}

/// Upgrades a tracker JSON value to the current layout.
pub fn upgrade_value(value: &mut Value) {
    if let Some(Value::Array(entries)) = value.get_mut("entries") {
        upgrade_entries(entries);
    }
}

fn upgrade_entries(entries: &mut [Value]) {
    for entry in entries {
        let Value::Object(fields) = entry else {
            continue;
        };
        upgrade_time(fields, "startTime");
        upgrade_time(fields, "endTime");

        let has_parts = matches!(fields.get("subEntries"), Some(Value::Array(parts)) if !parts.is_empty());
        if has_parts {
            if let Some(Value::Array(parts)) = fields.get_mut("subEntries") {
                upgrade_entries(parts);
            }
        } else {
            fields.remove("subEntries");
        }
    }
}

fn upgrade_time(fields: &mut Map<String, Value>, key: &str) {
    let Some(value) = fields.get_mut(key) else {
        return;
    };
    if value.as_str().is_some_and(|s| s.trim().is_empty()) {
        *value = Value::Null;
        return;
    }
    let seconds = match &*value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(seconds) = seconds.filter(|s| s.is_finite()) else {
        return;
    };
    #[allow(clippy::cast_possible_truncation)]
    let millis = (seconds * 1000.0).round() as i64;
    if let Some(ts) = DateTime::from_timestamp_millis(millis) {
        *value = Value::String(iso_timestamp::format(&ts));
    }
}
