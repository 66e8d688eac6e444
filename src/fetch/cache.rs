//! Disk-backed caching downloader
//!
//! Decorates the HTTP downloader with a write-through page cache: one file
//! per URL, named by the hex-encoded SHA-256 of the URL string. Documents
//! read their body from disk lazily at extraction time, so a damaged cache
//! surfaces as an extraction failure rather than a fetch failure.

use crate::fetch::{parser, Document, Downloader, HttpDownloader};
use crate::{ExtractError, FetchError};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use url::Url;

/// Downloader that caches fetched page bodies on disk
pub struct CachingDownloader {
    http: HttpDownloader,
    directory: PathBuf,
}

impl CachingDownloader {
    /// Creates a caching downloader, creating the cache directory if needed
    pub fn new(http: HttpDownloader, directory: impl Into<PathBuf>) -> std::io::Result<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { http, directory })
    }

    fn cache_path(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hasher.finalize();
        self.directory.join(format!("{}.html", hex::encode(digest)))
    }
}

#[async_trait]
impl Downloader for CachingDownloader {
    async fn fetch(&self, url: &str) -> Result<Box<dyn Document>, FetchError> {
        let path = self.cache_path(url);

        if let Ok(base) = Url::parse(url) {
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                tracing::debug!("Cache hit for {}", url);
                return Ok(Box::new(CachedPage { base, path }));
            }
        }

        let page = self.http.fetch_page(url).await?;
        tokio::fs::write(&path, page.body())
            .await
            .map_err(|e| FetchError::Cache {
                url: url.to_string(),
                source: e,
            })?;

        Ok(Box::new(CachedPage {
            base: page.url().clone(),
            path,
        }))
    }
}

/// A page whose body lives in the cache directory
struct CachedPage {
    base: Url,
    path: PathBuf,
}

impl Document for CachedPage {
    fn extract_links(&self) -> Result<Vec<String>, ExtractError> {
        let body =
            std::fs::read_to_string(&self.path).map_err(|e| ExtractError::CacheRead {
                url: self.base.to_string(),
                source: e,
            })?;
        Ok(parser::extract_links(&body, &self.base))
    }
}
