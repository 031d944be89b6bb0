//! Continue command for adding a running part to an existing entry.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Args;

use stt_core::duration::running_entry_path;
use stt_core::ops::start_sub_entry;
use stt_core::Vault;

use crate::commands::util::{BlockArgs, mutate, parse_entry_path};

#[derive(Debug, Args)]
pub struct ContinueArgs {
    #[command(flatten)]
    pub target: BlockArgs,

    /// Entry to continue, numbered in storage order (e.g. 2 or 2.1).
    pub entry: String,

    /// Name of the new part (defaults to "Part N").
    #[arg(short, long)]
    pub name: Option<String>,
}

pub fn run<W: Write, V: Vault + ?Sized>(
    writer: &mut W,
    vault: &V,
    args: &ContinueArgs,
) -> Result<()> {
    let path = parse_entry_path(&args.entry)?;
    let now = Utc::now();

    let (part_path, part_name) = mutate(vault, &args.target, |tracker| {
        if let Some(running) = running_entry_path(&tracker.entries) {
            bail!("entry {running} is running; stop it before continuing another");
        }
        let entry = tracker
            .entry_mut(&path)
            .with_context(|| format!("no entry {path}"))?;
        start_sub_entry(entry, args.name.as_deref(), now);
        let index = entry.sub_entries.len() - 1;
        Ok((path.child(index), entry.sub_entries[index].name.clone()))
    })?;

    tracing::info!(entry = %path, part = %part_path, "continued entry");
    writeln!(writer, "Continued {path} as {part_path} {part_name}")?;
    Ok(())
}
