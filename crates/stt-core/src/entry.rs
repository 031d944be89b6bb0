//! Tracker and entry data shapes.
//!
//! A [`Tracker`] is the JSON body of one fenced tracker block. Its entries form
//! a tree: an entry with sub-entries is "split" and its own times are ignored
//! in favor of its parts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named time span, either a leaf or a split parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Display label.
    pub name: String,

    /// When the span started. Absent on split parents.
    #[serde(default, with = "iso_timestamp")]
    pub start_time: Option<DateTime<Utc>>,

    /// When the span ended. Absent while the entry is running.
    #[serde(default, with = "iso_timestamp")]
    pub end_time: Option<DateTime<Utc>>,

    /// Parts of a split entry. Empty for leaves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_entries: Vec<Entry>,

    /// Display-only flag hiding the parts of a split entry.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
}

impl Entry {
    /// Creates an open leaf entry starting at `start`.
    pub fn started(name: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            start_time: Some(start),
            end_time: None,
            sub_entries: Vec::new(),
            collapsed: false,
        }
    }

    /// Creates a closed leaf entry.
    pub fn closed(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            end_time: Some(end),
            ..Self::started(name, start)
        }
    }

    /// Returns true if this entry has been split into parts.
    pub fn is_split(&self) -> bool {
        !self.sub_entries.is_empty()
    }

    /// Returns the entry at `path` relative to this entry's parts.
    fn descend(&self, indices: &[usize]) -> Option<&Self> {
        match indices.split_first() {
            None => Some(self),
            Some((first, rest)) => self.sub_entries.get(*first)?.descend(rest),
        }
    }

    fn descend_mut(&mut self, indices: &[usize]) -> Option<&mut Self> {
        match indices.split_first() {
            None => Some(self),
            Some((first, rest)) => self.sub_entries.get_mut(*first)?.descend_mut(rest),
        }
    }
}

/// Overall punch-in/punch-out bracket in Unix seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

/// The root collection of entries for one tracker block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    /// Top-level entries in insertion order.
    #[serde(default)]
    pub entries: Vec<Entry>,

    #[serde(default)]
    pub meta: Meta,
}

impl Tracker {
    /// Returns the entry addressed by `path`.
    pub fn entry(&self, path: &EntryPath) -> Option<&Entry> {
        let (first, rest) = path.0.split_first()?;
        self.entries.get(*first)?.descend(rest)
    }

    /// Returns a mutable reference to the entry addressed by `path`.
    pub fn entry_mut(&mut self, path: &EntryPath) -> Option<&mut Entry> {
        let (first, rest) = path.0.split_first()?;
        self.entries.get_mut(*first)?.descend_mut(rest)
    }

    /// Returns true if any leaf in the tree is still running.
    pub fn is_running(&self) -> bool {
        crate::duration::running_entry(&self.entries).is_some()
    }
}

/// Errors from parsing an [`EntryPath`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryPathError {
    #[error("entry path cannot be empty")]
    Empty,

    #[error("invalid entry path segment {segment:?}: expected a number starting at 1")]
    InvalidSegment { segment: String },
}

/// Position of an entry in the tree, as storage indices from the root.
///
/// Written 1-based and dot-separated: `2.1` is the first part of the second
/// top-level entry. Paths always address storage order, never display order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryPath(Vec<usize>);

impl EntryPath {
    /// Path of a top-level entry.
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    /// Path of the `index`-th part of this entry.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Zero-based storage indices.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Nesting depth; top-level entries have depth 0.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

impl From<Vec<usize>> for EntryPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", index + 1)?;
        }
        Ok(())
    }
}

impl FromStr for EntryPath {
    type Err = EntryPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EntryPathError::Empty);
        }
        s.split('.')
            .map(|segment| match segment.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n - 1),
                _ => Err(EntryPathError::InvalidSegment {
                    segment: segment.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Serde adapter for optional ISO-8601 timestamps with millisecond precision.
pub(crate) mod iso_timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parses RFC 3339, falling back to an offset-less `T`-separated form read as UTC.
    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
            })
            .ok()
    }

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
