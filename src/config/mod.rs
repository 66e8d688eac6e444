//! Configuration module for Fathom
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files.
//!
//! # Example
//!
//! ```no_run
//! use fathom::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("fathom.toml")).unwrap();
//! println!("Download slots: {}", config.crawler.downloaders);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, CrawlerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::load_config;
