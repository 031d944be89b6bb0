//! Simple time tracker CLI library.
//!
//! This crate provides the CLI interface for trackers stored in Markdown.

mod cli;
pub mod commands;
mod config;
mod vault;

pub use cli::{Cli, Commands};
pub use config::{Config, HrConfig};
pub use vault::FsVault;
