//! Remove command for deleting an entry.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;

use stt_core::duration::running_entry_path;
use stt_core::ops::remove_entry;
use stt_core::Vault;

use crate::commands::util::{BlockArgs, mutate, parse_entry_path};

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub target: BlockArgs,

    /// Entry to remove, numbered in storage order (e.g. 2 or 2.1).
    pub entry: String,
}

pub fn run<W: Write, V: Vault + ?Sized>(writer: &mut W, vault: &V, args: &RemoveArgs) -> Result<()> {
    let path = parse_entry_path(&args.entry)?;

    let name = mutate(vault, &args.target, |tracker| {
        let running = running_entry_path(&tracker.entries);
        if running.is_some_and(|running| running.indices().starts_with(path.indices())) {
            bail!("entry {path} is running; stop it before removing it");
        }
        let Some(name) = tracker.entry(&path).map(|entry| entry.name.clone()) else {
            bail!("no entry {path}");
        };
        if !remove_entry(&mut tracker.entries, &path) {
            bail!("no entry {path}");
        }
        Ok(name)
    })?;

    tracing::info!(%path, %name, "removed entry");
    writeln!(writer, "Removed {path} {name}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use insta::assert_snapshot;
    use stt_core::{MemoryVault, load_all_trackers};

    const DOC: &str = "```simple-time-tracker\n\
        {\"entries\":[\
        {\"name\":\"Work\",\"subEntries\":[\
        {\"name\":\"Part 1\",\"startTime\":\"2024-01-01T09:00:00.000Z\",\"endTime\":\"2024-01-01T10:00:00.000Z\"},\
        {\"name\":\"Part 2\",\"startTime\":\"2024-01-01T11:00:00.000Z\",\"endTime\":\"2024-01-01T11:30:00.000Z\"}]},\
        {\"name\":\"Docs\",\"startTime\":\"2024-01-01T12:00:00.000Z\",\"endTime\":null}]}\n\
        ```\n";

    fn args(entry: &str) -> RemoveArgs {
        RemoveArgs {
            target: BlockArgs::new("day.md"),
            entry: entry.to_string(),
        }
    }

    #[test]
    fn remove_part_collapses_parent() {
        let vault = MemoryVault::new().with_file("day.md", DOC);
        let mut output = Vec::new();

        run(&mut output, &vault, &args("1.2")).unwrap();

        let document = vault.read(Path::new("day.md")).unwrap();
        let work = &load_all_trackers(&document)[0].tracker.entries[0];
        assert!(work.sub_entries.is_empty());
        assert_eq!(work.name, "Work");
        assert!(work.start_time.is_some());
        assert_snapshot!(String::from_utf8(output).unwrap(), @"Removed 1.2 Part 2");
    }

    #[test]
    fn remove_refuses_running_entry() {
        let vault = MemoryVault::new().with_file("day.md", DOC);
        let err = run(&mut Vec::new(), &vault, &args("2")).unwrap_err();
        assert!(err.to_string().contains("is running"));
        assert_eq!(vault.read(Path::new("day.md")).unwrap(), DOC);
    }

    #[test]
    fn remove_rejects_unknown_entry() {
        let vault = MemoryVault::new().with_file("day.md", DOC);
        let err = run(&mut Vec::new(), &vault, &args("1.5")).unwrap_err();
        assert_eq!(err.to_string(), "no entry 1.5");
    }
}
