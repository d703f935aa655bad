//! Feed-Harvest main entry point
//!
//! This is the command-line interface for the newsletter source harvester.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use feed_harvest::config::{compute_file_hash, load_config_or_default, validate, Config};
use feed_harvest::output::{aggregate, build_sinks, print_statistics, write_all};
use feed_harvest::{load_sources, run_harvest, Source};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Feed-Harvest: pulls recent items from a list of websites
///
/// For each source it looks for an RSS or Atom feed, reads the newest
/// entries, and falls back to homepage headlines when no feed works. The
/// results are written as JSON, NDJSON and a markdown summary.
#[derive(Parser, Debug)]
#[command(name = "feed-harvest")]
#[command(version)]
#[command(about = "Harvests recent items from newsletter sources", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the JSON source list
    #[arg(long, env = "SOURCES_JSON", value_name = "FILE")]
    sources: Option<PathBuf>,

    /// Where to write the JSON report
    #[arg(long, env = "OUT_JSON", value_name = "FILE")]
    out_json: Option<PathBuf>,

    /// Where to write the NDJSON mirror
    #[arg(long, env = "OUT_NDJSON", value_name = "FILE")]
    out_ndjson: Option<PathBuf>,

    /// Where to write the markdown summary
    #[arg(long, env = "OUT_SUMMARY", value_name = "FILE")]
    out_summary: Option<PathBuf>,

    /// Maximum items kept per source
    #[arg(long, env = "ITEMS_PER_SOURCE")]
    items_per_source: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Number of sources harvested at once
    #[arg(long, env = "CONCURRENCY")]
    concurrency: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and sources and show what would be harvested
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line and environment overrides on top of the file
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.sources {
            config.input.sources_path = path.to_string_lossy().into_owned();
        }
        if let Some(path) = &self.out_json {
            config.output.json_path = path.to_string_lossy().into_owned();
        }
        if let Some(path) = &self.out_ndjson {
            config.output.ndjson_path = path.to_string_lossy().into_owned();
        }
        if let Some(path) = &self.out_summary {
            config.output.summary_path = path.to_string_lossy().into_owned();
        }
        if let Some(items) = self.items_per_source {
            config.harvest.items_per_source = items;
        }
        if let Some(timeout) = self.timeout_ms {
            config.harvest.timeout_ms = timeout;
        }
        if let Some(concurrency) = self.concurrency {
            config.harvest.concurrency = concurrency;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    let sources_path = PathBuf::from(&config.input.sources_path);
    tracing::info!("Loading sources from: {}", sources_path.display());
    let sources = load_sources(&sources_path)?;

    let sources_hash = match compute_file_hash(&sources_path) {
        Ok(hash) => Some(hash),
        Err(e) => {
            tracing::warn!("Could not hash {}: {}", sources_path.display(), e);
            None
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &sources, sources_hash.as_deref());
    } else {
        handle_harvest(&config, sources, sources_hash, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("feed_harvest=info,warn"),
            1 => EnvFilter::new("feed_harvest=debug,info"),
            2 => EnvFilter::new("feed_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be harvested
fn handle_dry_run(config: &Config, sources: &[Source], sources_hash: Option<&str>) {
    println!("=== Feed-Harvest Dry Run ===\n");

    println!("Harvest Configuration:");
    println!("  Items per source: {}", config.harvest.items_per_source);
    println!("  Timeout: {}ms", config.harvest.timeout_ms);
    println!("  Concurrency: {}", config.harvest.concurrency);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  JSON: {}", config.output.json_path);
    println!("  NDJSON: {}", config.output.ndjson_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\nSources ({}):", sources.len());
    if let Some(hash) = sources_hash {
        println!("  SHA-256: {}", hash);
    }
    for source in sources {
        match &source.category {
            Some(category) => println!("  - [{}] {} ({}) <{}>", source.id, source.name, category, source.url),
            None => println!("  - [{}] {} <{}>", source.id, source.name, source.url),
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would harvest {} sources", sources.len());
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: &Config,
    sources: Vec<Source>,
    sources_hash: Option<String>,
    quiet: bool,
) -> anyhow::Result<()> {
    let results = run_harvest(config, sources).await?;

    let mut report = aggregate(&results, Utc::now(), config.output.sample_size);
    if let Some(hash) = sources_hash {
        report = report.with_sources_digest(hash);
    }

    let sinks = build_sinks(&config.output);
    write_all(&sinks, &report).with_context(|| {
        format!(
            "Failed to write reports under {}",
            Path::new(&config.output.json_path)
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .display()
        )
    })?;

    println!("Harvest complete: {} items", report.count);
    if !quiet {
        println!();
        print_statistics(&report.summary);
    }

    Ok(())
}
