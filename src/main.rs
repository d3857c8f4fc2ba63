//! Recipe Dredger main entry point
//!
//! This is the command-line interface for the Recipe Dredger importer.

use anyhow::{bail, Context};
use clap::Parser;
use recipe_dredger::config::{load_config_with_hash, load_site_list, site_list_path, Config};
use recipe_dredger::output::print_run_summary;
use recipe_dredger::Supervisor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// How often the observer task logs a status line
const STATUS_INTERVAL: Duration = Duration::from_secs(10);

/// Recipe Dredger: sitemap-driven recipe importer
///
/// Recipe Dredger walks the sitemaps of recipe sites, verifies that each
/// page carries a recipe, and imports new ones into Mealie and/or Tandoor
/// without duplicating what those services already have.
#[derive(Parser, Debug)]
#[command(name = "recipe-dredger")]
#[command(version = "1.0.0")]
#[command(about = "A sitemap-driven recipe importer", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Site list to scrape instead of the config's active-site-list
    #[arg(long, value_name = "FILE")]
    sites: Option<PathBuf>,

    /// Verify recipes without importing anything
    #[arg(long, conflicts_with = "test_connection")]
    dry_run: bool,

    /// Test connectivity to the enabled services and exit
    #[arg(long)]
    test_connection: bool,

    /// Print the final run status as JSON
    #[arg(long)]
    json: bool,

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

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.test_connection {
        return handle_test_connection(&config).await;
    }

    if cli.dry_run {
        config.scraper.dry_run = true;
    }

    let sites_path = cli
        .sites
        .clone()
        .unwrap_or_else(|| site_list_path(&cli.config, &config));
    let sites = load_site_list(&sites_path)
        .with_context(|| format!("loading site list {}", sites_path.display()))?;
    tracing::info!("Loaded {} sites from {}", sites.len(), sites_path.display());

    handle_scrape(config, sites, cli.json).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("recipe_dredger=info,warn"),
            1 => EnvFilter::new("recipe_dredger=debug,info"),
            2 => EnvFilter::new("recipe_dredger=trace,debug"),
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

/// Handles the --test-connection mode: checks every enabled service
async fn handle_test_connection(config: &Config) -> anyhow::Result<()> {
    if !config.any_backend_enabled() {
        bail!("No service is enabled in the configuration");
    }

    let results = Supervisor::test_connections(config).await?;
    let mut failed = 0;

    println!("=== Connection Test ===\n");
    for (name, status) in &results {
        let mark = if status.is_ok() { "✓" } else { "✗" };
        println!("  {} {}: {}", mark, name, status);
        if !status.is_ok() {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} services failed the connection test", failed, results.len());
    }
    Ok(())
}

/// Handles the main scrape: runs in the background, stops on Ctrl-C
async fn handle_scrape(config: Config, sites: Vec<String>, json: bool) -> anyhow::Result<()> {
    if config.scraper.dry_run {
        tracing::info!("Dry run: recipes will be verified but not imported");
    }

    let supervisor = Arc::new(Supervisor::new());
    if let Err(e) = supervisor.start(&config, sites) {
        tracing::error!("Failed to start scrape: {}", e);
        return Err(e.into());
    }

    let observer = tokio::spawn(observe_status(Arc::clone(&supervisor)));
    let interrupt = {
        let supervisor = Arc::clone(&supervisor);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, stopping after the current request");
                if let Err(e) = supervisor.stop() {
                    tracing::warn!("Could not stop scrape: {}", e);
                }
            }
        })
    };

    let report = supervisor.wait().await;
    observer.abort();
    interrupt.abort();

    let Some(report) = report else {
        bail!("Scrape task ended without a report");
    };

    print_run_summary(&report);

    if json {
        println!("{}", serde_json::to_string_pretty(&supervisor.status())?);
    }

    Ok(())
}

/// Logs a status line periodically until the run leaves the active phases
async fn observe_status(supervisor: Arc<Supervisor>) {
    let mut ticker = tokio::time::interval(STATUS_INTERVAL);
    ticker.tick().await;

    while supervisor.is_active() {
        ticker.tick().await;
        let status = supervisor.status();
        tracing::info!(
            "[Status] {}% ({}/{} sites), {} imported, current: {}",
            status.progress,
            status.sites_completed,
            status.sites_total,
            status.total_imported,
            status.current_site
        );
    }
}
