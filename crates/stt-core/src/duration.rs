//! Elapsed-time computation and running-entry lookup.
//!
//! Durations are milliseconds. A running leaf is measured up to `now`, which
//! is what makes live counters tick.

use chrono::{DateTime, Utc};

use crate::entry::{Entry, EntryPath};

/// Duration of an entry in milliseconds, measured up to the current time.
pub fn duration(entry: &Entry) -> i64 {
    duration_at(entry, Utc::now())
}

/// Duration of an entry in milliseconds, measuring open leaves up to `now`.
///
/// Split entries are the sum of their parts. A leaf without a start time
/// contributes nothing.
pub fn duration_at(entry: &Entry, now: DateTime<Utc>) -> i64 {
    if entry.is_split() {
        return total_duration_at(&entry.sub_entries, now);
    }
    let Some(start) = entry.start_time else {
        return 0;
    };
    let end = entry.end_time.unwrap_or(now);
    (end - start).num_milliseconds()
}

/// Sum of [`duration`] over a sequence of entries.
pub fn total_duration(entries: &[Entry]) -> i64 {
    total_duration_at(entries, Utc::now())
}

/// Sum of [`duration_at`] over a sequence of entries.
pub fn total_duration_at(entries: &[Entry], now: DateTime<Utc>) -> i64 {
    entries.iter().map(|entry| duration_at(entry, now)).sum()
}

/// Sum of the durations of top-level entries whose name is a pause keyword.
///
/// Names are compared lower-cased against the keywords as given.
pub fn break_duration_at(entries: &[Entry], pause_keywords: &[String], now: DateTime<Utc>) -> i64 {
    entries
        .iter()
        .filter(|entry| is_break(entry, pause_keywords))
        .map(|entry| duration_at(entry, now))
        .sum()
}

/// Returns true if the entry's lower-cased name is one of the pause keywords.
pub fn is_break(entry: &Entry, pause_keywords: &[String]) -> bool {
    let name = entry.name.to_lowercase();
    pause_keywords.iter().any(|keyword| *keyword == name)
}

/// Finds the first leaf without an end time, depth-first in entry order.
pub fn running_entry(entries: &[Entry]) -> Option<&Entry> {
    for entry in entries {
        if entry.is_split() {
            if let Some(running) = running_entry(&entry.sub_entries) {
                return Some(running);
            }
        } else if entry.end_time.is_none() {
            return Some(entry);
        }
    }
    None
}

/// Path of the entry [`running_entry`] would return.
pub fn running_entry_path(entries: &[Entry]) -> Option<EntryPath> {
    find_running(entries, &[])
}

fn find_running(entries: &[Entry], prefix: &[usize]) -> Option<EntryPath> {
    for (index, entry) in entries.iter().enumerate() {
        let mut indices = prefix.to_vec();
        indices.push(index);
        if entry.is_split() {
            if let Some(path) = find_running(&entry.sub_entries, &indices) {
                return Some(path);
            }
        } else if entry.end_time.is_none() {
            return Some(EntryPath::from(indices));
        }
    }
    None
}
