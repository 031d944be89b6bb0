//! Stop command for ending the running entry.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use stt_core::ops::end_running_entry;
use stt_core::Vault;

use crate::commands::util::{BlockArgs, mutate};

#[derive(Debug, Args)]
pub struct StopArgs {
    #[command(flatten)]
    pub target: BlockArgs,
}

pub fn run<W: Write, V: Vault + ?Sized>(writer: &mut W, vault: &V, args: &StopArgs) -> Result<()> {
    let now = Utc::now();
    let (path, name) = mutate(vault, &args.target, |tracker| {
        let path = end_running_entry(tracker, now).context("nothing is running")?;
        let name = tracker
            .entry(&path)
            .map(|entry| entry.name.clone())
            .unwrap_or_default();
        Ok((path, name))
    })?;

    tracing::info!(%path, %name, "stopped entry");
    writeln!(writer, "Stopped {path} {name}")?;
    Ok(())
}
