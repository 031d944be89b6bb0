//! Insert command for appending an empty tracker block to a document.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stt_core::{StoreError, Vault, insert_tracker_block, load_all_trackers};

#[derive(Debug, Args)]
pub struct InsertArgs {
    /// Markdown document to append the tracker to (created if missing).
    pub file: PathBuf,
}

pub fn run<W: Write, V: Vault + ?Sized>(writer: &mut W, vault: &V, args: &InsertArgs) -> Result<()> {
    let context = || format!("failed to insert tracker into {}", args.file.display());
    let count = match vault.read(&args.file) {
        Err(StoreError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
            let document = insert_tracker_block("");
            vault.write(&args.file, &document).with_context(context)?;
            load_all_trackers(&document).len()
        }
        Err(err) => return Err(err).with_context(context),
        Ok(_) => {
            let mut count = 0;
            vault
                .update(&args.file, &mut |document| {
                    let document = insert_tracker_block(&document);
                    count = load_all_trackers(&document).len();
                    Ok(document)
                })
                .with_context(context)?;
            count
        }
    };

    tracing::info!(file = %args.file.display(), block = count, "inserted tracker block");
    writeln!(
        writer,
        "Inserted tracker block {count} into {}",
        args.file.display()
    )?;
    Ok(())
}
