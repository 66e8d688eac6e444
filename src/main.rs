//! Fathom main entry point
//!
//! Command-line interface for the Fathom crawler.

use anyhow::Context;
use clap::Parser;
use fathom::config::{load_config, Config};
use fathom::crawler::Crawler;
use fathom::fetch::{CachingDownloader, Downloader, HttpDownloader};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Fathom: a depth-bounded concurrent web crawler
///
/// Crawls breadth-first from a seed URL, following links for a fixed number
/// of layers while limiting simultaneous downloads globally and per host.
#[derive(Parser, Debug)]
#[command(name = "fathom")]
#[command(version)]
#[command(about = "A depth-bounded concurrent web crawler", long_about = None)]
struct Cli {
    /// Seed URL to crawl from
    url: String,

    /// Number of link layers to follow
    #[arg(short, long)]
    depth: Option<u32>,

    /// Maximum simultaneous downloads
    #[arg(long)]
    downloaders: Option<usize>,

    /// Maximum simultaneous link extractions
    #[arg(long)]
    extractors: Option<usize>,

    /// Maximum simultaneous downloads from one host
    #[arg(long = "per-host")]
    per_host: Option<usize>,

    /// Skip URLs containing this substring (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    excludes: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cache fetched pages in this directory
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

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

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    // command-line flags win over the config file
    if let Some(depth) = cli.depth {
        config.crawler.depth = depth;
    }
    if let Some(n) = cli.downloaders {
        config.crawler.downloaders = n;
    }
    if let Some(n) = cli.extractors {
        config.crawler.extractors = n;
    }
    if let Some(n) = cli.per_host {
        config.crawler.per_host = n;
    }
    if let Some(dir) = &cli.cache_dir {
        config.cache.directory = Some(dir.display().to_string());
    }
    config.excludes.extend(cli.excludes.iter().cloned());

    let downloader = build_downloader(&config)?;
    let crawler = Crawler::from_config(downloader, &config.crawler)?;

    tracing::info!(
        "Crawling {} to depth {} ({} downloaders, {} extractors, {} per host)",
        cli.url,
        config.crawler.depth,
        config.crawler.downloaders,
        config.crawler.extractors,
        config.crawler.per_host
    );

    let result = crawler
        .download(&cli.url, config.crawler.depth, &config.excludes)
        .await?;

    println!("Downloaded URLs:");
    for url in &result.downloaded {
        println!("{}", url);
    }

    if !result.errors.is_empty() {
        println!();
        println!("Failed URLs:");
        for (url, error) in &result.errors {
            println!("{}", url);
            println!("  {}", error);
        }
    }

    crawler.close().await;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("fathom=info,warn"),
            1 => EnvFilter::new("fathom=debug,info"),
            2 => EnvFilter::new("fathom=trace,debug"),
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

/// Builds the downloader stack: plain HTTP, or cached when a directory is set
fn build_downloader(config: &Config) -> anyhow::Result<Arc<dyn Downloader>> {
    let http = HttpDownloader::new(&config.user_agent).context("failed to build HTTP client")?;

    match &config.cache.directory {
        Some(dir) => {
            let caching = CachingDownloader::new(http, dir)
                .with_context(|| format!("failed to prepare cache directory {}", dir))?;
            Ok(Arc::new(caching))
        }
        None => Ok(Arc::new(http)),
    }
}
