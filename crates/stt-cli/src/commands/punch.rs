//! Punch commands for recording the start and end of the working day.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::Utc;
use clap::Args;

use stt_core::format::format_punch_time;
use stt_core::ops::{add_end_time, add_start_time};
use stt_core::Vault;

use crate::Config;
use crate::commands::util::{BlockArgs, mutate};

#[derive(Debug, Args)]
pub struct PunchArgs {
    #[command(flatten)]
    pub target: BlockArgs,
}

/// Which side of the punch bracket to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punch {
    In,
    Out,
}

pub fn run<W: Write, V: Vault + ?Sized>(
    writer: &mut W,
    vault: &V,
    args: &PunchArgs,
    punch: Punch,
    config: &Config,
) -> Result<()> {
    if !config.display.enable_punch_in_out {
        bail!("punching in and out is disabled (display.enable_punch_in_out)");
    }

    let now = Utc::now();
    let recorded = mutate(vault, &args.target, |tracker| {
        match punch {
            Punch::In => add_start_time(tracker, now),
            Punch::Out => add_end_time(tracker, now),
        }
        Ok(now.timestamp())
    })?;

    let label = match punch {
        Punch::In => "in",
        Punch::Out => "out",
    };
    tracing::info!(punch = label, at = recorded, "recorded punch time");
    writeln!(writer, "Punched {label} at {}", format_punch_time(recorded))?;
    Ok(())
}
