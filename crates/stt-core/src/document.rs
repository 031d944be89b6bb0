//! Locating tracker blocks inside Markdown documents.
//!
//! A tracker lives in a fenced code block:
//!
//! ````text
//! ```simple-time-tracker
//! {"entries":[],"meta":{}}
//! ```
//! ````
//!
//! Line numbers are zero-based indices into `document.split('\n')`.

use crate::entry::Tracker;
use crate::migrate::parse_tracker;

/// Opening fence of a tracker block.
pub const FENCE_OPEN: &str = "```simple-time-tracker";

/// Closing fence of any code block.
pub const FENCE_CLOSE: &str = "```";

/// One tracker block found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerBlock {
    /// Zero-based position among the document's tracker blocks.
    pub index: usize,
    /// Line of the opening fence.
    pub open_line: usize,
    /// Line of the closing fence.
    pub close_line: usize,
    /// Body text between the fences, one `\n` after every line.
    pub raw: String,
    /// The loaded tracker; empty when the body could not be parsed.
    pub tracker: Tracker,
    /// Why the body could not be parsed, if it could not.
    pub parse_error: Option<String>,
}

impl TrackerBlock {
    /// Lines holding the block body (exclusive of both fences).
    pub const fn body_lines(&self) -> std::ops::Range<usize> {
        self.open_line + 1..self.close_line
    }
}

/// Finds and parses every terminated tracker block in a document.
///
/// A block runs from an opening fence to the nearest following closing
/// fence. A block with no closing fence is dropped.
pub fn load_all_trackers(document: &str) -> Vec<TrackerBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<(usize, String)> = None;

    for (line_no, line) in document.split('\n').enumerate() {
        let trimmed = line.trim_end();
        match open.take() {
            None => {
                if trimmed == FENCE_OPEN {
                    open = Some((line_no, String::new()));
                }
            }
            Some((open_line, raw)) if trimmed == FENCE_CLOSE => {
                let (tracker, parse_error) = match parse_tracker(&raw) {
                    Ok(tracker) => (tracker, None),
                    Err(err) => {
                        tracing::warn!(open_line, error = %err, "failed to parse tracker block");
                        (Tracker::default(), Some(err.to_string()))
                    }
                };
                blocks.push(TrackerBlock {
                    index: blocks.len(),
                    open_line,
                    close_line: line_no,
                    raw,
                    tracker,
                    parse_error,
                });
            }
            Some((open_line, mut raw)) => {
                raw.push_str(line);
                raw.push('\n');
                open = Some((open_line, raw));
            }
        }
    }

    if let Some((open_line, _)) = open {
        tracing::debug!(open_line, "ignoring unterminated tracker block");
    }
    blocks
}

/// Serializes a tracker to the single-line JSON stored in a block.
pub fn serialize_tracker(tracker: &Tracker) -> String {
    // Plain structs with string keys always serialize.
    serde_json::to_string(tracker).unwrap_or_default()
}

/// Replaces the body of `block` with the serialized tracker.
///
/// Every byte outside the block body is preserved.
pub fn splice_tracker(document: &str, block: &TrackerBlock, tracker: &Tracker) -> String {
    let lines: Vec<&str> = document.split('\n').collect();
    let body = serialize_tracker(tracker);

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend_from_slice(&lines[..=block.open_line]);
    out.push(&body);
    out.extend_from_slice(&lines[block.close_line..]);
    out.join("\n")
}

/// Appends an empty tracker block to a document.
pub fn insert_tracker_block(document: &str) -> String {
    let mut out = document.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(FENCE_OPEN);
    out.push('\n');
    out.push_str(FENCE_CLOSE);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};

    use crate::entry::Entry;

    const DOC: &str = "# Monday\n\
        \n\
        ```simple-time-tracker\n\
        {\"entries\":[{\"name\":\"Work\",\"startTime\":\"2024-01-01T09:00:00.000Z\",\"endTime\":\"2024-01-01T10:00:00.000Z\"}],\"meta\":{}}\n\
        ```\n\
        \n\
        Notes after.\n";

    #[test]
    fn finds_a_single_block() {
        let blocks = load_all_trackers(DOC);
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.index, 0);
        assert_eq!(block.open_line, 2);
        assert_eq!(block.close_line, 4);
        assert_eq!(block.body_lines(), 3..4);
        assert_eq!(block.tracker.entries[0].name, "Work");
        assert!(block.parse_error.is_none());
    }

    #[test]
    fn unterminated_block_is_dropped() {
        let doc = format!("{DOC}\n```simple-time-tracker\n{{\"entries\":[]}}\n");
        let blocks = load_all_trackers(&doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].tracker.entries.len(), 1);
    }

    #[test]
    fn fences_tolerate_trailing_whitespace_and_crlf() {
        let doc = "```simple-time-tracker  \r\n{\"entries\":[]}\r\n```\r\n";
        let blocks = load_all_trackers(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].raw, "{\"entries\":[]}\r\n");
    }

    #[test]
    fn other_code_blocks_are_ignored() {
        let doc = "```rust\nfn main() {}\n```\n```simple-time-tracker\n```\n";
        let blocks = load_all_trackers(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].open_line, 3);
        assert_eq!(blocks[0].raw, "");
        assert_eq!(blocks[0].tracker, Tracker::default());
    }

    #[test]
    fn broken_body_records_parse_error() {
        let doc = "```simple-time-tracker\n{oops\n```\n";
        let blocks = load_all_trackers(doc);
        assert_eq!(blocks[0].tracker, Tracker::default());
        assert!(blocks[0].parse_error.is_some());
    }

    #[test]
    fn multiple_blocks_are_numbered_in_order() {
        let doc = "```simple-time-tracker\n```\ntext\n```simple-time-tracker\n{}\n```";
        let blocks = load_all_trackers(doc);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].index, 1);
        assert_eq!(blocks[1].open_line, 3);
        assert_eq!(blocks[1].close_line, 5);
    }

    #[test]
    fn splice_replaces_only_the_body() {
        let block = &load_all_trackers(DOC)[0];
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap();
        let mut tracker = block.tracker.clone();
        tracker.entries.push(Entry::started("Review", start));

        let updated = splice_tracker(DOC, block, &tracker);
        let expected = DOC.replace(
            "\"meta\":{}}",
            "{\"name\":\"Review\",\"startTime\":\"2024-01-01T11:00:00.000Z\",\"endTime\":null}],\"meta\":{}}",
        )
        .replace("}],{", "},{");
        assert_eq!(updated, expected);

        let reloaded = load_all_trackers(&updated);
        assert_eq!(reloaded[0].tracker, tracker);
    }

    #[test]
    fn splice_fills_an_empty_block() {
        let doc = "before\n```simple-time-tracker\n```\nafter";
        let block = &load_all_trackers(doc)[0];
        let updated = splice_tracker(doc, block, &Tracker::default());
        assert_eq!(
            updated,
            "before\n```simple-time-tracker\n{\"entries\":[],\"meta\":{}}\n```\nafter"
        );
    }

    #[test]
    fn insert_appends_block_on_new_line() {
        assert_eq!(
            insert_tracker_block("# Notes"),
            "# Notes\n```simple-time-tracker\n```\n"
        );
        assert_eq!(insert_tracker_block(""), "```simple-time-tracker\n```\n");
        assert_eq!(load_all_trackers(&insert_tracker_block("x\n")).len(), 1);
    }
}
