//! Page retrieval capabilities
//!
//! The crawler core treats fetching and link extraction as capabilities
//! behind traits so it can be driven by anything that produces documents.
//! This module declares those traits and ships two implementations:
//! - [`HttpDownloader`]: plain HTTP fetching over reqwest
//! - [`CachingDownloader`]: a decorator that stores page bodies on disk

mod cache;
mod http;
mod parser;

pub use cache::CachingDownloader;
pub use http::{build_http_client, HttpDownloader, Page};
pub use parser::extract_links;

use crate::{ExtractError, FetchError};
use async_trait::async_trait;

/// A capability that turns a URL into a fetched document.
///
/// Implementations must be shareable across tasks; the crawler holds one
/// downloader and calls it from every download worker.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Fetches `url`, failing with a [`FetchError`] on I/O-level problems.
    async fn fetch(&self, url: &str) -> Result<Box<dyn Document>, FetchError>;
}

/// A fetched page that can enumerate the URLs it links to.
pub trait Document: Send + Sync {
    /// Returns the absolute URLs this document links to.
    fn extract_links(&self) -> Result<Vec<String>, ExtractError>;
}
