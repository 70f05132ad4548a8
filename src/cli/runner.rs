//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, CriteriaArgs, OutputFormat};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::search::SearchCursor;
use crate::service::SearchService;
use crate::template::TemplateContext;
use crate::types::JsonValue;
use std::fs;
use std::io::Write;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing results to stdout
    pub fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        self.run_to(&mut stdout.lock())
    }

    /// Run the CLI command, writing results to `out`
    pub fn run_to(&self, out: &mut impl Write) -> Result<()> {
        match &self.cli.command {
            Commands::Search {
                criteria,
                max_records,
            } => self.search(criteria, *max_records, out),
            Commands::Count { criteria } => self.count(criteria, out),
            Commands::Validate => self.validate(out),
        }
    }

    /// Load the client config, rendering templates with env and `--var` values
    fn load_config(&self) -> Result<ClientConfig> {
        let mut ctx = TemplateContext::from_env();
        for (key, value) in &self.cli.vars {
            ctx.insert_var(key.as_str(), value.as_str());
        }
        ClientConfig::load(&self.cli.config, &ctx)
    }

    fn open_cursor<'s>(
        &self,
        service: &'s SearchService<JsonValue>,
        args: &CriteriaArgs,
    ) -> Result<SearchCursor<&'s SearchService<JsonValue>>> {
        let criteria = load_criteria(args)?;
        let page_size = args
            .page_size
            .unwrap_or_else(|| service.default_page_size());
        SearchCursor::with_page_size(service, criteria, page_size)
    }

    fn search(
        &self,
        args: &CriteriaArgs,
        max_records: Option<usize>,
        out: &mut impl Write,
    ) -> Result<()> {
        let config = self.load_config()?;
        let service = SearchService::new(&config)?;
        let mut cursor = self.open_cursor(&service, args)?;

        let started = Instant::now();
        let limit = max_records.unwrap_or(usize::MAX);
        let mut emitted = 0usize;

        for record in cursor.by_ref().take(limit) {
            self.write_record(out, &record?)?;
            emitted += 1;
        }
        out.flush()?;

        let total = cursor.total_records()?;
        info!(
            "Fetched {} page(s) in {:?}",
            cursor.current_page(),
            started.elapsed()
        );
        eprintln!("{emitted} record(s) emitted, {total} matching");
        Ok(())
    }

    fn count(&self, args: &CriteriaArgs, out: &mut impl Write) -> Result<()> {
        let config = self.load_config()?;
        let service = SearchService::new(&config)?;
        let mut cursor = self.open_cursor(&service, args)?;

        writeln!(out, "{}", cursor.total_records()?)?;
        Ok(())
    }

    fn validate(&self, out: &mut impl Write) -> Result<()> {
        let config = self.load_config()?;
        info!(
            "Config '{}' is valid: search at {}",
            self.cli.config.display(),
            config.search_url()
        );
        writeln!(out, "OK")?;
        Ok(())
    }

    fn write_record(&self, out: &mut impl Write, record: &JsonValue) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => serde_json::to_writer(&mut *out, record)?,
            OutputFormat::Pretty => serde_json::to_writer_pretty(&mut *out, record)?,
        }
        writeln!(out)?;
        Ok(())
    }
}

/// Read criteria from `--criteria` or `--criteria-json`
fn load_criteria(args: &CriteriaArgs) -> Result<JsonValue> {
    if let Some(json) = &args.criteria_json {
        return Ok(serde_json::from_str(json)?);
    }

    let path = args
        .criteria
        .as_ref()
        .ok_or_else(|| Error::config("No search criteria given (use --criteria or --criteria-json)"))?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    Ok(serde_json::from_str(&content)?)
}
