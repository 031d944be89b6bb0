//! List command for summarizing every tracker block in a document.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use stt_core::duration::total_duration_at;
use stt_core::{Settings, TrackerBlock, Vault, format_duration, load_document};

use crate::Config;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Markdown document to scan.
    pub file: PathBuf,

    /// Output JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// One tracker block as shown by `stt list`.
#[derive(Debug, Serialize)]
pub struct BlockSummary {
    pub block: usize,
    /// 1-based line of the opening fence.
    pub line: usize,
    pub running: bool,
    pub entries: usize,
    pub total: String,
    pub punched_in: Option<i64>,
    pub punched_out: Option<i64>,
    pub error: Option<String>,
}

pub fn summarize(blocks: &[TrackerBlock], settings: &Settings, now: DateTime<Utc>) -> Vec<BlockSummary> {
    blocks
        .iter()
        .map(|block| BlockSummary {
            block: block.index + 1,
            line: block.open_line + 1,
            running: block.tracker.is_running(),
            entries: block.tracker.entries.len(),
            total: format_duration(total_duration_at(&block.tracker.entries, now), settings, 0),
            punched_in: block.tracker.meta.start_time,
            punched_out: block.tracker.meta.end_time,
            error: block.parse_error.clone(),
        })
        .collect()
}

pub fn format_summaries(summaries: &[BlockSummary]) -> String {
    if summaries.is_empty() {
        return "No tracker blocks found.\n".to_string();
    }

    let mut out = String::new();
    for summary in summaries {
        let line = match &summary.error {
            Some(error) => format!(
                "#{:<3} line {:<5} unreadable: {error}",
                summary.block, summary.line
            ),
            None => {
                let state = if summary.running { "running" } else { "stopped" };
                let noun = if summary.entries == 1 { "entry" } else { "entries" };
                format!(
                    "#{:<3} line {:<5} {state:<8} {:>3} {noun:<8} {}",
                    summary.block, summary.line, summary.entries, summary.total
                )
            }
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn run<W: Write, V: Vault + ?Sized>(
    writer: &mut W,
    vault: &V,
    args: &ListArgs,
    config: &Config,
) -> Result<()> {
    let blocks = load_document(vault, &args.file)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    let summaries = summarize(&blocks, &config.display, Utc::now());

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summaries)?)?;
    } else {
        write!(writer, "{}", format_summaries(&summaries))?;
    }
    Ok(())
}
