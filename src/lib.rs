//! Fathom: a depth-bounded concurrent web crawler
//!
//! This crate implements a breadth-first crawler that follows links to a
//! bounded depth while capping simultaneous downloads globally, link
//! extraction globally, and downloads per host.

pub mod config;
pub mod crawler;
pub mod fetch;
pub mod url;

use thiserror::Error;

/// Main error type for Fathom operations
#[derive(Debug, Error)]
pub enum FathomError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawler is closed")]
    Closed,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Errors produced by a [`fetch::Downloader`] when retrieving a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connect { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Cache IO error for {url}: {source}")]
    Cache {
        url: String,
        source: std::io::Error,
    },
}

/// Errors produced by a [`fetch::Document`] when extracting links
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read cached page for {url}: {source}")]
    CacheRead {
        url: String,
        source: std::io::Error,
    },
}

/// A per-URL crawl failure, as recorded in the result's error map
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Malformed URL: {0}")]
    Malformed(#[from] UrlError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Result type alias for Fathom operations
pub type Result<T> = std::result::Result<T, FathomError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlResult, Crawler};
pub use fetch::{CachingDownloader, Document, Downloader, HttpDownloader};
pub use self::url::{extract_host, matches_any};
