//! Mutations triggered by user actions.
//!
//! Each operation runs to completion on an in-memory tracker which the caller
//! then persists. Operations check only what they need to act; a `false` or
//! `None` result means nothing changed.

use chrono::{DateTime, Utc};

use crate::duration::running_entry_path;
use crate::entry::{Entry, EntryPath, Tracker};

/// Appends a new running segment and returns its path.
///
/// A blank name becomes `Segment N` where N is the new entry count.
pub fn start_new_entry(tracker: &mut Tracker, name: Option<&str>, now: DateTime<Utc>) -> EntryPath {
    let name = non_blank(name)
        .map_or_else(|| format!("Segment {}", tracker.entries.len() + 1), String::from);
    tracker.entries.push(Entry::started(name, now));
    EntryPath::root(tracker.entries.len() - 1)
}

/// Ends the running entry at `now`, returning its path.
///
/// Returns `None` when nothing is running.
pub fn end_running_entry(tracker: &mut Tracker, now: DateTime<Utc>) -> Option<EntryPath> {
    let path = running_entry_path(&tracker.entries)?;
    let entry = tracker.entry_mut(&path)?;
    entry.end_time = Some(now);
    Some(path)
}

/// Continues an entry by appending a new running part.
///
/// A leaf is first split: its time range moves into a part named `Part 1`.
/// A blank name becomes `Part N` where N is the new part count.
pub fn start_sub_entry(entry: &mut Entry, name: Option<&str>, now: DateTime<Utc>) {
    if !entry.is_split() {
        let first = Entry {
            name: "Part 1".to_string(),
            start_time: entry.start_time.take(),
            end_time: entry.end_time.take(),
            sub_entries: Vec::new(),
            collapsed: false,
        };
        entry.sub_entries.push(first);
    }

    let name = non_blank(name)
        .map_or_else(|| format!("Part {}", entry.sub_entries.len() + 1), String::from);
    entry.sub_entries.push(Entry::started(name, now));
}

/// Removes the entry at `path` and returns whether anything was removed.
///
/// A split entry left with a single part becomes that part again: it takes
/// the part's times, or its parts if the survivor is split itself. A split
/// entry left with no parts is removed as well.
pub fn remove_entry(entries: &mut Vec<Entry>, path: &EntryPath) -> bool {
    remove_at(entries, path.indices())
}

fn remove_at(entries: &mut Vec<Entry>, indices: &[usize]) -> bool {
    match indices {
        [] => false,
        [index] => {
            if *index < entries.len() {
                entries.remove(*index);
                true
            } else {
                false
            }
        }
        [index, rest @ ..] => {
            let Some(parent) = entries.get_mut(*index) else {
                return false;
            };
            if !parent.is_split() || !remove_at(&mut parent.sub_entries, rest) {
                return false;
            }
            match parent.sub_entries.len() {
                0 => {
                    entries.remove(*index);
                }
                1 => {
                    let single = parent.sub_entries.remove(0);
                    parent.start_time = single.start_time;
                    parent.end_time = single.end_time;
                    parent.sub_entries = single.sub_entries;
                }
                _ => {}
            }
            true
        }
    }
}

/// Renames an entry. Blank names are ignored.
pub fn rename_entry(entry: &mut Entry, name: &str) -> bool {
    let Some(name) = non_blank(Some(name)) else {
        return false;
    };
    entry.name = name.to_string();
    true
}

/// Sets the times of a leaf entry.
///
/// `None` leaves a time untouched. Split entries derive their time from their
/// parts and are not changed.
pub fn set_entry_times(
    entry: &mut Entry,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    if entry.is_split() || (start.is_none() && end.is_none()) {
        return false;
    }
    if let Some(start) = start {
        entry.start_time = Some(start);
    }
    if let Some(end) = end {
        entry.end_time = Some(end);
    }
    true
}

/// Flips the display-only collapsed flag and returns the new value.
pub fn toggle_collapsed(entry: &mut Entry) -> bool {
    entry.collapsed = !entry.collapsed;
    entry.collapsed
}

/// Records the punch-in time as Unix seconds.
pub fn add_start_time(tracker: &mut Tracker, now: DateTime<Utc>) {
    tracker.meta.start_time = Some(now.timestamp());
}

/// Records the punch-out time as Unix seconds.
pub fn add_end_time(tracker: &mut Tracker, now: DateTime<Utc>) {
    tracker.meta.end_time = Some(now.timestamp());
}

fn non_blank(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|name| !name.is_empty())
}
