//! Linkwatch main entry point
//!
//! This is the command-line interface for the Linkwatch link checker.

use anyhow::Context;
use clap::Parser;
use linkwatch::config::{load_config_with_hash, validate, Config};
use linkwatch::crawler::{handle_start_check, CheckRequest};
use linkwatch::output::{print_report, JsonLinesSink};
use linkwatch::url::Scope;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Linkwatch: crawl a site and report its broken links
///
/// Linkwatch crawls every page reachable from START_URL on the same site and
/// checks each link it finds. Broken links are streamed to stdout as JSON
/// lines while the crawl runs, followed by one completion event.
#[derive(Parser, Debug)]
#[command(name = "linkwatch")]
#[command(version)]
#[command(about = "Crawl a site and report its broken links", long_about = None)]
struct Cli {
    /// URL to start crawling from; read as a JSON request from stdin if omitted
    #[arg(value_name = "START_URL")]
    start_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the audit log path from the configuration
    #[arg(long, value_name = "PATH")]
    audit_log: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective configuration and crawl scope without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(path) = cli.audit_log {
        apply_audit_log_override(&mut config, path)?;
    }

    let request = match cli.start_url {
        Some(start_url) => CheckRequest { start_url },
        None => read_request_from_stdin()?,
    };

    if cli.dry_run {
        return handle_dry_run(&config, config_hash.as_deref(), &request);
    }

    let sink = Arc::new(JsonLinesSink::new(std::io::stdout()));
    let report = handle_start_check(request, config, sink)
        .await
        .context("Link check failed")?;

    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Diagnostics go to stderr so they never mix with the event stream.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkwatch=info,warn"),
            1 => EnvFilter::new("linkwatch=debug,info"),
            2 => EnvFilter::new("linkwatch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Replaces the configured audit log path and re-validates the result
fn apply_audit_log_override(config: &mut Config, path: String) -> anyhow::Result<()> {
    config.output.audit_log_path = path;
    validate(config).context("Invalid --audit-log")
}

/// Reads one `{"start_url": "..."}` request from stdin
fn read_request_from_stdin() -> anyhow::Result<CheckRequest> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read request from stdin")?;
    serde_json::from_str(&input).context("Invalid check request")
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(
    config: &Config,
    config_hash: Option<&str>,
    request: &CheckRequest,
) -> anyhow::Result<()> {
    let scope = Scope::from_start_url(&request.start_url, config.crawler.scope_match)?;

    println!("=== Linkwatch Dry Run ===\n");

    println!("Crawl:");
    println!("  Start URL: {}", request.start_url);
    println!("  Scope token: {}", scope.token());
    println!("  Scope match: {:?}", scope.policy());

    println!("\nCrawler Configuration:");
    println!(
        "  Max concurrent checks: {}",
        config.crawler.max_concurrent_checks
    );
    println!("  Link timeout: {}s", config.crawler.link_timeout_secs);
    println!("  Page timeout: {}s", config.crawler.page_timeout_secs);
    println!("  Max redirects: {}", config.crawler.max_redirects);

    println!("\nUser Agent: {}", config.user_agent.header_value());
    println!("\nAudit log: {}", config.output.audit_log_path);
    match config_hash {
        Some(hash) => println!("Config hash: {}", hash),
        None => println!("Config: built-in defaults"),
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}
