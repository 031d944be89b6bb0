//! Markdown and CSV renderings of a tracker.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

use crate::duration::{duration_at, total_duration_at};
use crate::entry::{Entry, EntryPath, Tracker};
use crate::format::{format_duration, format_timestamp_in, ordered_indices};
use crate::settings::Settings;

const HEADER: [&str; 4] = ["Segment", "Start time", "End time", "Duration"];
const DISPLAY_HEADER: [&str; 5] = ["#", "Segment", "Start time", "End time", "Duration"];

/// One flattened entry, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub path: EntryPath,
    /// `[name, start, end, duration]`; blank cells are empty strings.
    pub cells: [String; 4],
}

/// Flattens the tracker depth-first in display order.
///
/// Collapsed entries still contribute their parts.
pub fn table_rows<Tz>(
    tracker: &Tracker,
    settings: &Settings,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Vec<TableRow>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    collect_rows(tracker, settings, tz, now, false)
}

/// Like [`table_rows`], but the parts of collapsed entries are left out.
pub fn visible_rows<Tz>(
    tracker: &Tracker,
    settings: &Settings,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Vec<TableRow>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    collect_rows(tracker, settings, tz, now, true)
}

fn collect_rows<Tz>(
    tracker: &Tracker,
    settings: &Settings,
    tz: &Tz,
    now: DateTime<Utc>,
    hide_collapsed: bool,
) -> Vec<TableRow>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut rows = Vec::new();
    for index in ordered_indices(tracker.entries.len(), settings) {
        push_section(
            &mut rows,
            &tracker.entries[index],
            EntryPath::root(index),
            settings,
            tz,
            now,
            hide_collapsed,
        );
    }
    rows
}

fn push_section<Tz>(
    rows: &mut Vec<TableRow>,
    entry: &Entry,
    path: EntryPath,
    settings: &Settings,
    tz: &Tz,
    now: DateTime<Utc>,
    hide_collapsed: bool,
) where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let stamp = |ts: Option<DateTime<Utc>>| {
        ts.map(|ts| format_timestamp_in(&ts, &settings.timestamp_format, tz))
            .unwrap_or_default()
    };
    let duration = if entry.end_time.is_some() || entry.is_split() {
        format_duration(duration_at(entry, now), settings, 0)
    } else {
        String::new()
    };

    rows.push(TableRow {
        path: path.clone(),
        cells: [
            entry.name.clone(),
            stamp(entry.start_time),
            stamp(entry.end_time),
            duration,
        ],
    });

    if hide_collapsed && entry.collapsed {
        return;
    }
    for index in ordered_indices(entry.sub_entries.len(), settings) {
        push_section(
            rows,
            &entry.sub_entries[index],
            path.child(index),
            settings,
            tz,
            now,
            hide_collapsed,
        );
    }
}

/// Renders the tracker as a column-aligned Markdown table with a total row.
pub fn create_markdown_table<Tz>(
    tracker: &Tracker,
    settings: &Settings,
    tz: &Tz,
    now: DateTime<Utc>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let total = format_duration(total_duration_at(&tracker.entries, now), settings, 0);

    let mut table: Vec<[String; 4]> = vec![HEADER.map(String::from)];
    table.extend(
        table_rows(tracker, settings, tz, now)
            .into_iter()
            .map(|row| row.cells),
    );
    table.push([
        "**Total**".to_string(),
        String::new(),
        String::new(),
        format!("**{total}**"),
    ]);
    align_markdown(&table)
}

/// Renders the table shown on screen.
///
/// Rows lead with their entry path, parts are indented by depth, and the
/// parts of collapsed entries are hidden behind a `[+]` marker.
pub fn create_display_table<Tz>(
    tracker: &Tracker,
    settings: &Settings,
    tz: &Tz,
    now: DateTime<Utc>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let total = format_duration(total_duration_at(&tracker.entries, now), settings, 0);

    let mut table: Vec<[String; 5]> = vec![DISPLAY_HEADER.map(String::from)];
    for row in visible_rows(tracker, settings, tz, now) {
        let hidden = tracker
            .entry(&row.path)
            .is_some_and(|entry| entry.collapsed && entry.is_split());
        let [name, start, end, duration] = row.cells;
        let marker = if hidden { " [+]" } else { "" };
        table.push([
            row.path.to_string(),
            format!("{}{name}{marker}", "  ".repeat(row.path.depth())),
            start,
            end,
            duration,
        ]);
    }
    table.push([
        String::new(),
        "**Total**".to_string(),
        String::new(),
        String::new(),
        format!("**{total}**"),
    ]);
    align_markdown(&table)
}

fn align_markdown<const N: usize>(table: &[[String; N]]) -> String {
    let widths: [usize; N] =
        std::array::from_fn(|i| table.iter().map(|row| row[i].chars().count()).max().unwrap_or(0));

    let mut ret = String::new();
    for (r, row) in table.iter().enumerate() {
        if r == 1 {
            let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            ret.push_str(&format!("| {} |\n", dashes.join(" | ")));
        }
        let padded: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        ret.push_str(&format!("| {} |\n", padded.join(" | ")));
    }
    ret
}

/// Renders the tracker as delimiter-separated rows followed by a total row.
///
/// Cells containing the delimiter, a quote or a line break are quoted.
pub fn create_csv<Tz>(tracker: &Tracker, settings: &Settings, tz: &Tz, now: DateTime<Utc>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let delimiter = settings.csv_delimiter.as_str();
    let total = format_duration(total_duration_at(&tracker.entries, now), settings, 0);

    let mut ret = String::new();
    let rows = table_rows(tracker, settings, tz, now)
        .into_iter()
        .map(|row| row.cells)
        .chain(std::iter::once([
            "Total".to_string(),
            String::new(),
            String::new(),
            total,
        ]));
    for cells in rows {
        let escaped: Vec<String> = cells
            .iter()
            .map(|cell| escape_csv(cell, delimiter))
            .collect();
        ret.push_str(&escaped.join(delimiter));
        ret.push('\n');
    }
    ret
}

fn escape_csv(cell: &str, delimiter: &str) -> String {
    if (!delimiter.is_empty() && cell.contains(delimiter)) || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
