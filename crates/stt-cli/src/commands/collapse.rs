//! Collapse command for toggling an entry's collapsed flag.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use stt_core::ops::toggle_collapsed;
use stt_core::Vault;

use crate::commands::util::{BlockArgs, mutate, parse_entry_path};

#[derive(Debug, Args)]
pub struct CollapseArgs {
    #[command(flatten)]
    pub target: BlockArgs,

    /// Entry to collapse or expand, numbered in storage order.
    pub entry: String,
}

pub fn run<W: Write, V: Vault + ?Sized>(writer: &mut W, vault: &V, args: &CollapseArgs) -> Result<()> {
    let path = parse_entry_path(&args.entry)?;

    let collapsed = mutate(vault, &args.target, |tracker| {
        let entry = tracker
            .entry_mut(&path)
            .with_context(|| format!("no entry {path}"))?;
        Ok(toggle_collapsed(entry))
    })?;

    let state = if collapsed { "Collapsed" } else { "Expanded" };
    writeln!(writer, "{state} {path}")?;
    Ok(())
}
