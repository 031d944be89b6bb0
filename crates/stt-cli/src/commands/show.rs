//! Show command for printing a tracker's counters and table.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};
use clap::Args;

use stt_core::format::format_punch_time_in;
use stt_core::{Settings, Tracker, Vault, countdown_at, create_display_table};

use crate::Config;
use crate::commands::util::{BlockArgs, load_block};

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub target: BlockArgs,
}

/// Renders the counters, punch bracket and table of a tracker.
pub fn render<Tz>(
    tracker: &Tracker,
    settings: &Settings,
    tz: &Tz,
    tz_name: &str,
    now: DateTime<Utc>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let countdown = countdown_at(tracker, settings, now);
    let mut out = format!("Time zone: {tz_name}\n");
    if let Some(current) = &countdown.current {
        out.push_str(&format!("Current:   {current}\n"));
    }
    out.push_str(&format!("Total:     {}\n", countdown.total));

    if settings.enable_punch_in_out {
        let punch = |value: Option<i64>| {
            value.map_or_else(|| "--:--".to_string(), |secs| format_punch_time_in(secs, tz))
        };
        out.push_str(&format!(
            "Punched:   in {}, out {}\n",
            punch(tracker.meta.start_time),
            punch(tracker.meta.end_time)
        ));
    }

    out.push('\n');
    out.push_str(&create_display_table(tracker, settings, tz, now));
    out
}

pub fn run<W: Write, V: Vault + ?Sized>(
    writer: &mut W,
    vault: &V,
    args: &ShowArgs,
    config: &Config,
) -> Result<()> {
    let block = load_block(vault, &args.target)?;
    if let Some(reason) = &block.parse_error {
        tracing::warn!(%reason, "showing unreadable tracker block as empty");
    }

    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
    let text = render(&block.tracker, &config.display, &Local, &timezone, Utc::now());
    write!(writer, "{text}")?;
    Ok(())
}
