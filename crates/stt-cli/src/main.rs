use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stt_cli::commands::punch::Punch;
use stt_cli::commands::{
    collapse, continue_entry, edit, export, hr, insert, list, punch, remove, show, start, stop,
    submit, watch,
};
use stt_cli::{Cli, Commands, Config, FsVault};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let vault = FsVault;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Insert(args) => insert::run(&mut out, &vault, args)?,
        Commands::List(args) => list::run(&mut out, &vault, args, &config)?,
        Commands::Show(args) => show::run(&mut out, &vault, args, &config)?,
        Commands::Start(args) => start::run(&mut out, &vault, args)?,
        Commands::Stop(args) => stop::run(&mut out, &vault, args)?,
        Commands::Continue(args) => continue_entry::run(&mut out, &vault, args)?,
        Commands::Remove(args) => remove::run(&mut out, &vault, args)?,
        Commands::Edit(args) => edit::run(&mut out, &vault, args, &config)?,
        Commands::Collapse(args) => collapse::run(&mut out, &vault, args)?,
        Commands::PunchIn(args) => punch::run(&mut out, &vault, args, Punch::In, &config)?,
        Commands::PunchOut(args) => punch::run(&mut out, &vault, args, Punch::Out, &config)?,
        Commands::Export(args) => export::run(&mut out, &vault, args, &config)?,
        Commands::Watch(args) => watch::run(&mut out, &vault, args, &config)?,
        Commands::Submit(args) => submit::run(&mut out, &vault, args, &config)?,
        Commands::Hr(action) => hr::run(&mut out, *action, &config)?,
    }

    out.flush()?;
    Ok(())
}
