//! Page-Ripple main entry point
//!
//! This is the command-line interface for the Page-Ripple aggregator.

use anyhow::{bail, Context};
use clap::Parser;
use page_ripple::config::{load_config_with_hash, Config};
use page_ripple::media::{accept_all, has_all_tags};
use page_ripple::output::{render_text, to_json, AggregationReport};
use page_ripple::{MediaClient, Seed};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Page-Ripple: concurrent paginated media aggregation
///
/// Fans out one lineage per seed, follows pagination links as pages arrive,
/// and stops once enough items were collected, every lineage is exhausted,
/// or the timeout fires.
#[derive(Parser, Debug)]
#[command(name = "page-ripple")]
#[command(version)]
#[command(about = "Concurrent paginated media aggregation", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Tag to search (repeatable; items must carry every tag)
    #[arg(short, long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Coordinate pair to search around, as LAT,LNG
    #[arg(short, long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    location: Option<String>,

    /// User id whose recent media to collect (repeatable)
    #[arg(short, long = "user", value_name = "ID")]
    users: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Validate config and show the seed requests without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    let seeds = collect_seeds(&cli)?;

    if cli.dry_run {
        return handle_dry_run(config, &seeds);
    }

    handle_aggregate(config, &cli, &seeds).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_ripple=info,warn"),
            1 => EnvFilter::new("page_ripple=debug,info"),
            2 => EnvFilter::new("page_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so JSON on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the seed list from the command line, in the order tags, location, users
fn collect_seeds(cli: &Cli) -> anyhow::Result<Vec<Seed>> {
    let mut seeds: Vec<Seed> = cli.tags.iter().map(|tag| Seed::Tag(tag.clone())).collect();

    if let Some(location) = &cli.location {
        seeds.push(Seed::location_from_str(location)?);
    }

    seeds.extend(cli.users.iter().map(|id| Seed::User(id.clone())));

    if seeds.is_empty() {
        bail!("nothing to search: pass at least one --tag, --location or --user");
    }

    Ok(seeds)
}

/// Handles --dry-run: prints resolved settings and the first request of each lineage
fn handle_dry_run(config: Config, seeds: &[Seed]) -> anyhow::Result<()> {
    let engine = config.engine.engine_config();

    println!("=== Page-Ripple Dry Run ===\n");
    println!("Engine Configuration:");
    println!("  Max accepted items: {}", engine.max_accepted_items);
    println!("  Max iterations: {}", engine.max_iterations);
    println!("  Timeout: {:?}", engine.timeout);
    println!("  Drain grace: {:?}", engine.drain_grace);
    println!("  Max concurrent fetches: {}", engine.max_concurrent_fetches);
    println!("  Page size: {}", engine.page_size);

    let client = MediaClient::new(config)?;
    let requests = client.seed_requests(seeds)?;

    println!("\nSeeds ({}):", seeds.len());
    for (seed, request) in seeds.iter().zip(&requests) {
        println!("  - {}", seed);
        println!("    * {}", request);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Runs one aggregation and prints its report
async fn handle_aggregate(config: Config, cli: &Cli, seeds: &[Seed]) -> anyhow::Result<()> {
    let policy = config.engine.engine_config().threshold_policy();
    let client = MediaClient::new(config)?;

    // Tag seeds filter to items carrying every tag; location and user seeds keep everything
    let predicate = if cli.tags.is_empty() {
        accept_all()
    } else {
        has_all_tags(&cli.tags)
    };

    tracing::info!("Aggregating over {} seeds", seeds.len());
    let started_at = chrono::Utc::now();
    let aggregation = client
        .aggregate(seeds, &predicate, &policy)
        .await
        .context("aggregation failed")?;

    let report = AggregationReport::new(seeds, started_at, aggregation);
    if cli.json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(())
}
