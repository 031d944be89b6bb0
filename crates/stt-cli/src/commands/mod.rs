//! CLI subcommand implementations.

pub mod collapse;
pub mod continue_entry;
pub mod edit;
pub mod export;
pub mod hr;
pub mod insert;
pub mod list;
pub mod punch;
pub mod remove;
pub mod show;
pub mod start;
pub mod stop;
pub mod submit;
pub mod util;
pub mod watch;
