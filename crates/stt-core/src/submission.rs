//! Projection of a tracker's punch bracket into an HR time-tracking request.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duration::{break_duration_at, is_break};
use crate::entry::Tracker;
use crate::format::format_timestamp_in;

/// Errors building a submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The tracker lacks a punch-in or punch-out time.
    #[error("punch in and out before submitting time")]
    NotPunched,

    /// A punch value is outside the representable range.
    #[error("punch time {value} is out of range")]
    InvalidPunchTime { value: i64 },
}

/// Body of a create-time-tracking call to the HR service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTrackingCreateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time_in_minutes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_time_in_minutes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Where submitted time is booked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionTarget {
    /// Tracking status such as `REQUESTED` or `EDITABLE`.
    pub status: String,
    pub project_id: String,
    pub category_id: String,
}

/// Builds a request from the tracker's punch bracket in the local time zone.
pub fn build_request(
    tracker: &Tracker,
    target: &SubmissionTarget,
    pause_keywords: &[String],
    now: DateTime<Utc>,
) -> Result<TimeTrackingCreateRequest, SubmissionError> {
    build_request_in(tracker, target, pause_keywords, &Local, now)
}

/// Builds a request from the tracker's punch bracket, rendering dates in `tz`.
///
/// Break time (top-level entries named after a pause keyword) is rounded up
/// to whole minutes. The comment lists the remaining top-level entry names.
pub fn build_request_in<Tz>(
    tracker: &Tracker,
    target: &SubmissionTarget,
    pause_keywords: &[String],
    tz: &Tz,
    now: DateTime<Utc>,
) -> Result<TimeTrackingCreateRequest, SubmissionError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let (Some(start), Some(end)) = (tracker.meta.start_time, tracker.meta.end_time) else {
        return Err(SubmissionError::NotPunched);
    };
    let start = from_unix(start)?;
    let end = from_unix(end)?;

    let break_ms = break_duration_at(&tracker.entries, pause_keywords, now);
    let break_time_in_minutes = (break_ms > 0).then(|| ceil_minutes(break_ms).to_string());

    let comment = tracker
        .entries
        .iter()
        .filter(|entry| !is_break(entry, pause_keywords))
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Ok(TimeTrackingCreateRequest {
        project_id: non_empty(&target.project_id),
        start_date: format_timestamp_in(&start, "YYYY-MM-DD", tz),
        end_date: format_timestamp_in(&end, "YYYY-MM-DD", tz),
        start_time: format_timestamp_in(&start, "HH:mm", tz),
        end_time: format_timestamp_in(&end, "HH:mm", tz),
        total_time_in_minutes: None,
        break_time_in_minutes,
        comment: Some(comment),
        status: non_empty(&target.status),
        categories: non_empty(&target.category_id).into_iter().collect(),
    })
}

fn from_unix(value: i64) -> Result<DateTime<Utc>, SubmissionError> {
    DateTime::from_timestamp(value, 0).ok_or(SubmissionError::InvalidPunchTime { value })
}

const fn ceil_minutes(ms: i64) -> i64 {
    (ms + 59_999) / 60_000
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
