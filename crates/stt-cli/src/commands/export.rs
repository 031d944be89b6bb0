//! Export command for printing a tracker as a Markdown table or CSV.

use std::io::Write;

use anyhow::Result;
use chrono::{Local, Utc};
use clap::{Args, ValueEnum};

use stt_core::{Vault, create_csv, create_markdown_table};

use crate::Config;
use crate::commands::util::{BlockArgs, load_block};

/// Export output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Table,
    Csv,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub target: BlockArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
    pub format: ExportFormat,
}

pub fn run<W: Write, V: Vault + ?Sized>(
    writer: &mut W,
    vault: &V,
    args: &ExportArgs,
    config: &Config,
) -> Result<()> {
    let block = load_block(vault, &args.target)?;
    let now = Utc::now();
    let text = match args.format {
        ExportFormat::Table => create_markdown_table(&block.tracker, &config.display, &Local, now),
        ExportFormat::Csv => create_csv(&block.tracker, &config.display, &Local, now),
    };
    write!(writer, "{text}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use stt_core::MemoryVault;

    const DOC: &str = "```simple-time-tracker\n\
        {\"entries\":[{\"name\":\"Work, mostly\",\"startTime\":\"2024-01-01T09:00:00.000Z\",\"endTime\":\"2024-01-01T10:00:00.000Z\"}]}\n\
        ```\n";

    fn export(format: ExportFormat, config: &Config) -> String {
        let vault = MemoryVault::new().with_file("day.md", DOC);
        let args = ExportArgs {
            target: BlockArgs::new("day.md"),
            format,
        };
        let mut output = Vec::new();
        run(&mut output, &vault, &args, config).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn export_table_has_header_and_total() {
        let output = export(ExportFormat::Table, &Config::default());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("| Segment "));
        assert!(lines[2].starts_with("| Work, mostly |"));
        assert!(lines[3].contains("**1h 0m 0s**"));
    }

    #[test]
    fn export_csv_quotes_and_totals() {
        let output = export(ExportFormat::Csv, &Config::default());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\"Work, mostly\","));
        assert!(lines[0].ends_with(",1h 0m 0s"));
        assert_eq!(lines[1], "Total,,,1h 0m 0s");
    }

    #[test]
    fn export_csv_honors_delimiter() {
        let mut config = Config::default();
        config.display.csv_delimiter = ";".to_string();
        let output = export(ExportFormat::Csv, &config);
        assert!(output.starts_with("Work, mostly;"));
        assert!(output.ends_with("Total;;;1h 0m 0s\n"));
    }
}
