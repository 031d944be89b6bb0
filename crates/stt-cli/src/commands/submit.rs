//! Submit command for booking a tracked day with the HR service.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Args;
use tokio::runtime::Runtime;

use stt_core::submission::build_request;
use stt_core::Vault;

use crate::Config;
use crate::commands::hr::connect;
use crate::commands::util::{BlockArgs, load_block};

#[derive(Debug, Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub target: BlockArgs,

    /// Print the request instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run<W: Write, V: Vault + ?Sized>(
    writer: &mut W,
    vault: &V,
    args: &SubmitArgs,
    config: &Config,
) -> Result<()> {
    let block = load_block(vault, &args.target)?;
    if block.tracker.is_running() {
        tracing::warn!("submitting while an entry is still running");
    }
    let request = build_request(
        &block.tracker,
        &config.hr.target(),
        &config.display.pause_keywords,
        Utc::now(),
    )
    .context("cannot build HR request")?;

    if args.dry_run {
        writeln!(writer, "{}", serde_json::to_string_pretty(&request)?)?;
        return Ok(());
    }

    let user_id = config.hr.user_id.trim();
    if user_id.is_empty() {
        bail!("hr.user_id is not set; pick one from `stt hr employees`");
    }

    let runtime = Runtime::new().context("failed to initialize tokio runtime")?;
    let reply = runtime.block_on(async {
        let client = connect(&config.hr).await?;
        client
            .track_time(user_id, &request)
            .await
            .context("HR service rejected the submission")
    })?;
    tracing::debug!(%reply, "HR service reply");

    writeln!(
        writer,
        "Submitted {} {}-{} for employee {user_id}",
        request.start_date, request.start_time, request.end_time
    )?;
    Ok(())
}
