//! Watch command for printing live counters of a tracker.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use stt_core::{Countdown, Vault, countdown_at};

use crate::Config;
use crate::commands::util::{BlockArgs, load_block};

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub target: BlockArgs,

    /// Seconds between updates.
    #[arg(short, long, default_value_t = 1)]
    pub interval: u64,

    /// Stop after this many updates.
    #[arg(long)]
    pub ticks: Option<u64>,
}

fn format_tick(countdown: &Countdown) -> String {
    match &countdown.current {
        Some(current) => format!("Current: {current}  Total: {}", countdown.total),
        None => format!("Total: {}", countdown.total),
    }
}

/// Prints counters until the tick limit is reached or the block disappears.
pub fn watch<W, V, S>(
    writer: &mut W,
    vault: &V,
    args: &WatchArgs,
    config: &Config,
    mut sleep: S,
) -> Result<()>
where
    W: Write,
    V: Vault + ?Sized,
    S: FnMut(Duration),
{
    let interval = Duration::from_secs(args.interval.max(1));
    let mut count = 0;
    loop {
        let block = match load_block(vault, &args.target) {
            Ok(block) => block,
            Err(err) => {
                tracing::debug!(error = %err, "tracker block went away");
                writeln!(writer, "Tracker block is gone; stopping.")?;
                return Ok(());
            }
        };

        let countdown = countdown_at(&block.tracker, &config.display, Utc::now());
        writeln!(writer, "{}", format_tick(&countdown))?;
        writer.flush()?;

        count += 1;
        if args.ticks.is_some_and(|ticks| count >= ticks) {
            return Ok(());
        }
        sleep(interval);
    }
}

pub fn run<W: Write, V: Vault + ?Sized>(
    writer: &mut W,
    vault: &V,
    args: &WatchArgs,
    config: &Config,
) -> Result<()> {
    watch(writer, vault, args, config, std::thread::sleep)
}
