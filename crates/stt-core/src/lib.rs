//! Core domain logic for the simple time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Entries: the tracker tree and its persisted JSON shape
//! - Durations: running totals, break time and display formatting
//! - Documents: finding, migrating and rewriting tracker blocks in Markdown
//! - Mutations: starting, stopping, splitting and editing entries
//! - Submission: projecting a punch bracket into an HR time-tracking request

pub mod document;
pub mod duration;
pub mod entry;
pub mod format;
pub mod migrate;
pub mod ops;
mod pattern;
pub mod settings;
pub mod store;
pub mod submission;
pub mod table;

pub use document::{TrackerBlock, insert_tracker_block, load_all_trackers, serialize_tracker};
pub use entry::{Entry, EntryPath, EntryPathError, Meta, Tracker};
pub use format::{Countdown, FormatError, countdown_at, format_duration};
pub use migrate::{LoadError, load_tracker};
pub use settings::Settings;
pub use store::{MemoryVault, StoreError, Vault, load_document, save_tracker};
pub use submission::{SubmissionError, SubmissionTarget, TimeTrackingCreateRequest};
pub use table::{TableRow, create_csv, create_display_table, create_markdown_table, visible_rows};
