//! Display ordering and formatting of durations and timestamps.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use thiserror::Error;

use crate::duration::{break_duration_at, duration_at, running_entry, total_duration_at};
use crate::entry::{Entry, Tracker};
use crate::pattern::MomentPattern;
use crate::settings::Settings;

/// Formatting errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Text did not match the editable timestamp pattern.
    #[error("{text:?} does not match the timestamp format {pattern:?}")]
    Unparseable { text: String, pattern: String },

    /// Wall-clock time does not exist in the time zone (DST gap).
    #[error("{text:?} is not a valid local time")]
    NonexistentLocalTime { text: String },
}

/// Entries in display order: storage order, or reversed when configured.
pub fn ordered_entries<'a>(entries: &'a [Entry], settings: &Settings) -> Vec<&'a Entry> {
    ordered_indices(entries.len(), settings)
        .into_iter()
        .map(|index| &entries[index])
        .collect()
}

/// Storage indices in display order.
pub fn ordered_indices(len: usize, settings: &Settings) -> Vec<usize> {
    if settings.reverse_segment_order {
        (0..len).rev().collect()
    } else {
        (0..len).collect()
    }
}

/// A millisecond count split into calendar units.
///
/// Days roll into months using the average Gregorian month
/// (146097 days per 4800 months).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DurationParts {
    years: i64,
    months: i64,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    total_days: i64,
    total_hours: i64,
}

impl DurationParts {
    const fn from_millis(ms: i64) -> Self {
        let total_seconds = ms / 1000;
        let total_minutes = total_seconds / 60;
        let total_hours = total_minutes / 60;
        let total_days = total_hours / 24;

        let total_months = total_days * 4800 / 146_097;
        let days = total_days - (total_months * 146_097 + 4799) / 4800;

        Self {
            years: total_months / 12,
            months: total_months % 12,
            days,
            hours: total_hours % 24,
            minutes: total_minutes % 60,
            seconds: total_seconds % 60,
            total_days,
            total_hours,
        }
    }
}

/// Formats a duration after subtracting `break_ms`.
///
/// Clock mode renders `HH:MM:SS`, prefixed by `D.` when fine-grained
/// durations are on and at least one full day has passed. Verbose mode
/// renders units like `1d 2h 0m 5s`: leading zero units are dropped, every
/// unit after the first shown one is kept, and seconds always appear.
/// Without fine-grained durations, days and above fold into the hours.
/// Negative results render as zero.
pub fn format_duration(total_ms: i64, settings: &Settings, break_ms: i64) -> String {
    let parts = DurationParts::from_millis(total_ms.saturating_sub(break_ms).max(0));
    let fine = settings.fine_grained_durations;
    let hours = if fine { parts.hours } else { parts.total_hours };

    if settings.timestamp_durations {
        let mut ret = String::new();
        if fine && parts.total_days > 0 {
            ret.push_str(&format!("{}.", parts.total_days));
        }
        ret.push_str(&format!(
            "{hours:02}:{:02}:{:02}",
            parts.minutes, parts.seconds
        ));
        return ret;
    }

    let mut units = Vec::with_capacity(6);
    if fine {
        units.extend([(parts.years, "y"), (parts.months, "M"), (parts.days, "d")]);
    }
    units.extend([(hours, "h"), (parts.minutes, "m")]);

    let mut pieces: Vec<String> = units
        .into_iter()
        .skip_while(|(value, _)| *value == 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect();
    pieces.push(format!("{}s", parts.seconds));
    pieces.join(" ")
}

/// Renders a timestamp with the display pattern in the local time zone.
pub fn format_timestamp(ts: &DateTime<Utc>, settings: &Settings) -> String {
    format_timestamp_in(ts, &settings.timestamp_format, &Local)
}

/// Renders a timestamp with a moment.js pattern in the given time zone.
pub fn format_timestamp_in<Tz>(ts: &DateTime<Utc>, pattern: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    MomentPattern::new(pattern).format(&ts.with_timezone(tz))
}

/// Renders a timestamp with the editable pattern in the local time zone.
pub fn format_editable_timestamp(ts: &DateTime<Utc>, settings: &Settings) -> String {
    format_timestamp_in(ts, &settings.editable_timestamp_format, &Local)
}

/// Parses user-edited text written in the editable pattern, as local time.
pub fn parse_editable_timestamp(
    text: &str,
    settings: &Settings,
) -> Result<DateTime<Utc>, FormatError> {
    parse_timestamp_in(text, &settings.editable_timestamp_format, &Local)
}

/// Parses text written in a moment.js pattern as wall-clock time in `tz`.
///
/// Ambiguous wall-clock times (DST fall-back) resolve to the earlier instant.
pub fn parse_timestamp_in<Tz: TimeZone>(
    text: &str,
    pattern: &str,
    tz: &Tz,
) -> Result<DateTime<Utc>, FormatError> {
    let naive = MomentPattern::new(pattern)
        .parse_naive(text)
        .map_err(|_| FormatError::Unparseable {
            text: text.to_string(),
            pattern: pattern.to_string(),
        })?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| FormatError::NonexistentLocalTime {
            text: text.to_string(),
        })
}

/// Renders a punch bracket value (Unix seconds) as local `HH:mm`.
pub fn format_punch_time(unix_secs: i64) -> String {
    format_punch_time_in(unix_secs, &Local)
}

/// Renders a punch bracket value (Unix seconds) as `HH:mm` in `tz`.
pub fn format_punch_time_in<Tz>(unix_secs: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    DateTime::from_timestamp(unix_secs, 0).map_or_else(String::new, |ts| {
        format_timestamp_in(&ts, "HH:mm", tz)
    })
}

/// The two live counters shown above a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    /// Duration of the running entry, if any.
    pub current: Option<String>,
    /// Total tracked time minus break time.
    pub total: String,
}

/// Computes the live counters for a tracker at `now`.
pub fn countdown_at(tracker: &Tracker, settings: &Settings, now: DateTime<Utc>) -> Countdown {
    let break_ms = break_duration_at(&tracker.entries, &settings.pause_keywords, now);
    let current = running_entry(&tracker.entries)
        .map(|entry| format_duration(duration_at(entry, now), settings, 0));
    let total = format_duration(total_duration_at(&tracker.entries, now), settings, break_ms);
    Countdown { current, total }
}
