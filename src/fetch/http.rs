//! HTTP downloader implementation
//!
//! This module handles the actual network retrieval:
//! - building the HTTP client with the crawler user-agent string
//! - GET requests with status and content-type handling
//! - error classification (timeout, connection, transport)

use crate::config::UserAgentConfig;
use crate::fetch::{parser, Document, Downloader};
use crate::{ExtractError, FetchError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with the crawler's user-agent string
///
/// The user agent is formatted as `Name/Version (+ContactURL; ContactEmail)`
/// so site operators can identify and reach the crawler's owner.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Downloader that fetches pages over HTTP
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Creates a downloader with a client built from the user-agent config
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Creates a downloader around an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and returns the page held in memory.
    ///
    /// Non-2xx statuses are failures. Responses without a Content-Type
    /// header are assumed to be HTML; anything that is neither is kept as a
    /// successful download that will yield no links.
    pub(crate) async fn fetch_page(&self, url: &str) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let is_html = match response.headers().get(CONTENT_TYPE) {
            Some(value) => value
                .to_str()
                .map(|ct| ct.contains("text/html"))
                .unwrap_or(false),
            None => true,
        };

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            source: e,
        })?;

        tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());

        Ok(Page {
            url: final_url,
            body,
            is_html,
        })
    }
}

fn classify_send_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn fetch(&self, url: &str) -> Result<Box<dyn Document>, FetchError> {
        let page = self.fetch_page(url).await?;
        Ok(Box::new(page))
    }
}

/// A fetched page held in memory
pub struct Page {
    url: Url,
    body: String,
    is_html: bool,
}

impl Page {
    /// Final URL after redirects; relative links resolve against this
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Document for Page {
    fn extract_links(&self) -> Result<Vec<String>, ExtractError> {
        if !self.is_html {
            tracing::debug!("Skipping link extraction for non-HTML page {}", self.url);
            return Ok(Vec::new());
        }
        Ok(parser::extract_links(&self.body, &self.url))
    }
}
