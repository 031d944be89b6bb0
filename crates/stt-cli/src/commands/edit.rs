//! Edit command for renaming an entry and changing its times.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;

use stt_core::Vault;
use stt_core::duration::running_entry_path;
use stt_core::format::format_editable_timestamp;
use stt_core::ops::{rename_entry, set_entry_times};

use crate::Config;
use crate::commands::util::{BlockArgs, mutate, parse_edit_time, parse_entry_path};

#[derive(Debug, Args)]
pub struct EditArgs {
    #[command(flatten)]
    pub target: BlockArgs,

    /// Entry to edit, numbered in storage order (e.g. 2 or 2.1).
    pub entry: String,

    /// New name.
    #[arg(short, long)]
    pub name: Option<String>,

    /// New start time, in the editable timestamp format.
    #[arg(long)]
    pub start: Option<String>,

    /// New end time, in the editable timestamp format.
    #[arg(long)]
    pub end: Option<String>,
}

pub fn run<W: Write, V: Vault + ?Sized>(
    writer: &mut W,
    vault: &V,
    args: &EditArgs,
    config: &Config,
) -> Result<()> {
    if args.name.is_none() && args.start.is_none() && args.end.is_none() {
        bail!("nothing to edit; pass --name, --start or --end");
    }
    let path = parse_entry_path(&args.entry)?;
    let start = parse_edit_time(args.start.as_deref(), &config.display)?;
    let end = parse_edit_time(args.end.as_deref(), &config.display)?;

    let (name, times) = mutate(vault, &args.target, |tracker| {
        if end.is_some() && running_entry_path(&tracker.entries).as_ref() == Some(&path) {
            bail!("entry {path} is running; use stop to end it");
        }
        let entry = tracker
            .entry_mut(&path)
            .with_context(|| format!("no entry {path}"))?;

        if let Some(name) = &args.name {
            if !rename_entry(entry, name) {
                bail!("entry names cannot be blank");
            }
        }
        if (start.is_some() || end.is_some()) && !set_entry_times(entry, start, end) {
            bail!("entry {path} has parts; edit the times of its parts instead");
        }
        if let (Some(start), Some(end)) = (entry.start_time, entry.end_time) {
            if end < start {
                tracing::warn!(%path, "entry ends before it starts");
            }
        }
        let times = entry.start_time.map(|start| {
            let end = entry.end_time.map_or_else(
                || "running".to_string(),
                |end| format_editable_timestamp(&end, &config.display),
            );
            format!(
                " ({} to {end})",
                format_editable_timestamp(&start, &config.display)
            )
        });
        Ok((entry.name.clone(), times.unwrap_or_default()))
    })?;

    tracing::info!(%path, %name, "edited entry");
    writeln!(writer, "Updated {path} {name}{times}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use chrono::{Local, TimeZone, Utc};
    use insta::assert_snapshot;
    use stt_core::{MemoryVault, Settings, load_all_trackers};

    const DOC: &str = "```simple-time-tracker\n\
        {\"entries\":[\
        {\"name\":\"Work\",\"startTime\":\"2024-01-01T09:00:00.000Z\",\"endTime\":\"2024-01-01T10:00:00.000Z\"},\
        {\"name\":\"Split\",\"subEntries\":[\
        {\"name\":\"Part 1\",\"startTime\":\"2024-01-01T11:00:00.000Z\",\"endTime\":\"2024-01-01T11:30:00.000Z\"},\
        {\"name\":\"Part 2\",\"startTime\":\"2024-01-01T12:00:00.000Z\",\"endTime\":\"2024-01-01T12:30:00.000Z\"}]}]}\n\
        ```\n";

    fn args(entry: &str) -> EditArgs {
        EditArgs {
            target: BlockArgs::new("day.md"),
            entry: entry.to_string(),
            name: None,
            start: None,
            end: None,
        }
    }

    #[test]
    fn edit_renames_and_retimes_leaf() {
        let vault = MemoryVault::new().with_file("day.md", DOC);
        let mut output = Vec::new();
        let args = EditArgs {
            name: Some("Deep work".to_string()),
            start: Some("2024-01-01 08:15:00".to_string()),
            end: Some("2024-01-01 11:00:00".to_string()),
            ..args("1")
        };

        run(&mut output, &vault, &args, &Config::default()).unwrap();

        let document = vault.read(Path::new("day.md")).unwrap();
        let entry = &load_all_trackers(&document)[0].tracker.entries[0];
        let local = |h, m| {
            Local
                .with_ymd_and_hms(2024, 1, 1, h, m, 0)
                .earliest()
                .unwrap()
                .with_timezone(&Utc)
        };
        assert_eq!(entry.name, "Deep work");
        assert_eq!(entry.start_time, Some(local(8, 15)));
        assert_eq!(entry.end_time, Some(local(11, 0)));
        assert_snapshot!(
            String::from_utf8(output).unwrap(),
            @"Updated 1 Deep work (2024-01-01 08:15:00 to 2024-01-01 11:00:00)"
        );
    }

    #[test]
    fn edit_uses_configured_editable_format() {
        let vault = MemoryVault::new().with_file("day.md", DOC);
        let mut config = Config::default();
        config.display = Settings {
            editable_timestamp_format: "DD.MM.YYYY HH:mm".to_string(),
            ..Settings::default()
        };
        let args = EditArgs {
            end: Some("01.01.2024 18:45".to_string()),
            ..args("2.2")
        };

        run(&mut Vec::new(), &vault, &args, &config).unwrap();

        let document = vault.read(Path::new("day.md")).unwrap();
        let part = &load_all_trackers(&document)[0].tracker.entries[1].sub_entries[1];
        let expected = Local
            .with_ymd_and_hms(2024, 1, 1, 18, 45, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(part.end_time, Some(expected));
    }

    #[test]
    fn edit_refuses_times_on_split_entry() {
        let vault = MemoryVault::new().with_file("day.md", DOC);
        let args = EditArgs {
            start: Some("2024-01-01 08:00:00".to_string()),
            ..args("2")
        };
        let err = run(&mut Vec::new(), &vault, &args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("has parts"));
        assert_eq!(vault.read(Path::new("day.md")).unwrap(), DOC);
    }

    #[test]
    fn edit_refuses_end_time_of_running_entry() {
        let doc = "```simple-time-tracker\n\
            {\"entries\":[{\"name\":\"Live\",\"startTime\":\"2024-01-01T09:00:00.000Z\",\"endTime\":null}]}\n\
            ```\n";
        let vault = MemoryVault::new().with_file("day.md", doc);
        let config = Config::default();
        let end = EditArgs {
            end: Some("2024-01-01 10:00:00".to_string()),
            ..args("1")
        };

        let err = run(&mut Vec::new(), &vault, &end, &config).unwrap_err();
        assert_eq!(err.to_string(), "entry 1 is running; use stop to end it");
        assert_eq!(vault.read(Path::new("day.md")).unwrap(), doc);

        let start = EditArgs {
            name: Some("Still live".to_string()),
            start: Some("2024-01-01 08:30:00".to_string()),
            ..args("1")
        };
        let mut output = Vec::new();
        run(&mut output, &vault, &start, &config).unwrap();
        assert_snapshot!(
            String::from_utf8(output).unwrap(),
            @"Updated 1 Still live (2024-01-01 08:30:00 to running)"
        );
        let document = vault.read(Path::new("day.md")).unwrap();
        assert!(load_all_trackers(&document)[0].tracker.is_running());
    }

    #[test]
    fn edit_rejects_bad_input() {
        let vault = MemoryVault::new().with_file("day.md", DOC);
        let config = Config::default();

        let err = run(&mut Vec::new(), &vault, &args("1"), &config).unwrap_err();
        assert!(err.to_string().starts_with("nothing to edit"));

        let blank = EditArgs {
            name: Some("  ".to_string()),
            ..args("1")
        };
        let err = run(&mut Vec::new(), &vault, &blank, &config).unwrap_err();
        assert_eq!(err.to_string(), "entry names cannot be blank");

        let garbled = EditArgs {
            end: Some("tomorrow".to_string()),
            ..args("1")
        };
        assert!(run(&mut Vec::new(), &vault, &garbled, &config).is_err());
        assert_eq!(vault.read(Path::new("day.md")).unwrap(), DOC);
    }
}
