//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::collapse::CollapseArgs;
use crate::commands::continue_entry::ContinueArgs;
use crate::commands::edit::EditArgs;
use crate::commands::export::ExportArgs;
use crate::commands::hr::HrAction;
use crate::commands::insert::InsertArgs;
use crate::commands::list::ListArgs;
use crate::commands::punch::PunchArgs;
use crate::commands::remove::RemoveArgs;
use crate::commands::show::ShowArgs;
use crate::commands::start::StartArgs;
use crate::commands::stop::StopArgs;
use crate::commands::submit::SubmitArgs;
use crate::commands::watch::WatchArgs;

/// Time tracking inside Markdown notes.
///
/// Trackers live in fenced `simple-time-tracker` blocks of a Markdown
/// document. Every command edits or reads one block in place and leaves
/// the rest of the document untouched.
#[derive(Debug, Parser)]
#[command(name = "stt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Append an empty tracker block to a document.
    Insert(InsertArgs),

    /// Summarize every tracker block in a document.
    List(ListArgs),

    /// Show counters, punch times and the entry table.
    Show(ShowArgs),

    /// Start a new segment.
    Start(StartArgs),

    /// End the running entry.
    Stop(StopArgs),

    /// Continue an entry by adding a running part.
    Continue(ContinueArgs),

    /// Remove an entry.
    Remove(RemoveArgs),

    /// Rename an entry or change its times.
    Edit(EditArgs),

    /// Toggle whether an entry's parts are collapsed.
    Collapse(CollapseArgs),

    /// Record the start of the working day.
    PunchIn(PunchArgs),

    /// Record the end of the working day.
    PunchOut(PunchArgs),

    /// Print the tracker as a Markdown table or CSV.
    Export(ExportArgs),

    /// Print live counters until interrupted.
    Watch(WatchArgs),

    /// Book the punched day with the HR service.
    Submit(SubmitArgs),

    /// Look up HR employees, projects and categories.
    #[command(subcommand)]
    Hr(HrAction),
}
