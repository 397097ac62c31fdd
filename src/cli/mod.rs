//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `sync` - Extract surveys, questions, responses and answers (default)
//! - `discover` - List available streams
//! - `check` - Test connection to the API

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{catalog_message, connection_status, Runner};
