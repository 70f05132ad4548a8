//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Page through remote search results
#[derive(Parser, Debug)]
#[command(name = "paged-search")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short, long, global = true, default_value = "paged-search.yaml")]
    pub config: PathBuf,

    /// Template variable for the config, as KEY=VALUE (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", global = true, value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a search and print every matching record
    Search {
        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Stop after this many records
        #[arg(long)]
        max_records: Option<usize>,
    },

    /// Print the total number of matching records
    Count {
        #[command(flatten)]
        criteria: CriteriaArgs,
    },

    /// Validate the client configuration
    Validate,
}

/// Where the search criteria come from
#[derive(Args, Debug)]
pub struct CriteriaArgs {
    /// Criteria file (JSON)
    #[arg(long, conflicts_with = "criteria_json", required_unless_present = "criteria_json")]
    pub criteria: Option<PathBuf>,

    /// Inline criteria JSON
    #[arg(long)]
    pub criteria_json: Option<String>,

    /// Records per page, overriding the config
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON document per line
    Json,
    /// Indented JSON
    Pretty,
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}
