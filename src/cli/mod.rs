//! CLI module
//!
//! Command-line interface for running paged searches against a configured
//! backend.
//!
//! # Commands
//!
//! - `search` - Stream every matching record, one JSON document per line
//! - `count` - Print the backend's total for a search
//! - `validate` - Check a client config file

mod commands;
mod runner;

pub use commands::{Cli, Commands, CriteriaArgs, OutputFormat};
pub use runner::Runner;
