//! Start command for beginning a new segment.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::Utc;
use clap::Args;

use stt_core::duration::running_entry_path;
use stt_core::ops::start_new_entry;
use stt_core::Vault;

use crate::commands::util::{BlockArgs, mutate};

#[derive(Debug, Args)]
pub struct StartArgs {
    #[command(flatten)]
    pub target: BlockArgs,

    /// Segment name (defaults to "Segment N").
    #[arg(short, long)]
    pub name: Option<String>,
}

pub fn run<W: Write, V: Vault + ?Sized>(writer: &mut W, vault: &V, args: &StartArgs) -> Result<()> {
    let now = Utc::now();
    let (path, name) = mutate(vault, &args.target, |tracker| {
        if let Some(path) = running_entry_path(&tracker.entries) {
            bail!("entry {path} is already running; stop it first");
        }
        let path = start_new_entry(tracker, args.name.as_deref(), now);
        let name = tracker
            .entry(&path)
            .map(|entry| entry.name.clone())
            .unwrap_or_default();
        Ok((path, name))
    })?;

    tracing::info!(%path, %name, "started segment");
    writeln!(writer, "Started {path} {name}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use insta::assert_snapshot;
    use stt_core::{MemoryVault, load_all_trackers};

    const EMPTY: &str = "```simple-time-tracker\n```\n";

    fn args(name: Option<&str>) -> StartArgs {
        StartArgs {
            target: BlockArgs::new("day.md"),
            name: name.map(String::from),
        }
    }

    #[test]
    fn start_appends_running_segment() {
        let vault = MemoryVault::new().with_file("day.md", EMPTY);
        let mut output = Vec::new();

        run(&mut output, &vault, &args(None)).unwrap();

        let document = vault.read(Path::new("day.md")).unwrap();
        let tracker = &load_all_trackers(&document)[0].tracker;
        assert!(tracker.is_running());
        assert_eq!(tracker.entries[0].name, "Segment 1");
        assert_snapshot!(String::from_utf8(output).unwrap(), @"Started 1 Segment 1");
    }

    #[test]
    fn start_refuses_while_running() {
        let vault = MemoryVault::new().with_file("day.md", EMPTY);
        run(&mut Vec::new(), &vault, &args(Some("Focus"))).unwrap();
        let before = vault.read(Path::new("day.md")).unwrap();

        let err = run(&mut Vec::new(), &vault, &args(None)).unwrap_err();

        assert!(err.to_string().contains("entry 1 is already running"));
        assert_eq!(vault.read(Path::new("day.md")).unwrap(), before);
    }
}
