//! Shared utilities for CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;

use stt_core::format::parse_editable_timestamp;
use stt_core::{EntryPath, Settings, Tracker, TrackerBlock, Vault, load_document, save_tracker};

/// Selects one tracker block of a document.
#[derive(Debug, Clone, Args)]
pub struct BlockArgs {
    /// Markdown document holding the tracker.
    pub file: PathBuf,

    /// Which tracker block of the document to use (1-based).
    #[arg(short, long, default_value_t = 1)]
    pub block: usize,
}

impl BlockArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            block: 1,
        }
    }
}

/// Loads the selected tracker block.
pub fn load_block<V: Vault + ?Sized>(vault: &V, target: &BlockArgs) -> Result<TrackerBlock> {
    if target.block == 0 {
        bail!("block numbers start at 1");
    }
    let blocks = load_document(vault, &target.file)
        .with_context(|| format!("failed to load {}", target.file.display()))?;
    let count = blocks.len();
    blocks.into_iter().nth(target.block - 1).with_context(|| {
        format!(
            "{} has no tracker block {} ({count} found)",
            target.file.display(),
            target.block
        )
    })
}

/// Applies `edit` to the selected tracker and writes the result back.
///
/// Nothing is written when `edit` fails.
pub fn mutate<V, T, F>(vault: &V, target: &BlockArgs, edit: F) -> Result<T>
where
    V: Vault + ?Sized,
    F: FnOnce(&mut Tracker) -> Result<T>,
{
    let block = load_block(vault, target)?;
    if let Some(reason) = &block.parse_error {
        bail!(
            "tracker block {} in {} is not valid tracker JSON ({reason}); fix it by hand first",
            target.block,
            target.file.display()
        );
    }

    let mut tracker = block.tracker.clone();
    let value = edit(&mut tracker)?;
    save_tracker(vault, &target.file, &block, &tracker).context("failed to save tracker")?;
    Ok(value)
}

/// Parses a 1-based dotted entry path such as `2.1`.
pub fn parse_entry_path(text: &str) -> Result<EntryPath> {
    text.parse::<EntryPath>()
        .with_context(|| format!("invalid entry {text:?}; use numbers like 2 or 2.1"))
}

/// Parses an optional user-entered timestamp in the editable format.
pub fn parse_edit_time(text: Option<&str>, settings: &Settings) -> Result<Option<DateTime<Utc>>> {
    text.map(|text| {
        parse_editable_timestamp(text.trim(), settings).with_context(|| {
            format!(
                "expected a timestamp like {}",
                settings.editable_timestamp_format
            )
        })
    })
    .transpose()
}
