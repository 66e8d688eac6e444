use serde::Deserialize;

/// Main configuration structure for Fathom
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    /// URLs containing any of these substrings are skipped entirely
    #[serde(default)]
    pub excludes: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of link layers to follow from the seed URL
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Maximum number of simultaneous downloads
    #[serde(default = "default_limit")]
    pub downloaders: usize,

    /// Maximum number of pages having links extracted simultaneously
    #[serde(default = "default_limit")]
    pub extractors: usize,

    /// Maximum number of simultaneous downloads from a single host
    #[serde(rename = "per-host", default = "default_limit")]
    pub per_host: usize,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default = "default_contact_url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default = "default_contact_email")]
    pub contact_email: String,
}

/// Page cache configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// Directory for cached page bodies; caching is disabled when unset
    pub directory: Option<String>,
}

fn default_depth() -> u32 {
    1
}

fn default_limit() -> usize {
    6
}

fn default_crawler_name() -> String {
    "Fathom".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_contact_url() -> String {
    "https://example.invalid/fathom".to_string()
}

fn default_contact_email() -> String {
    "crawler@example.invalid".to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            downloaders: default_limit(),
            extractors: default_limit(),
            per_host: default_limit(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: default_contact_url(),
            contact_email: default_contact_email(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            cache: CacheConfig::default(),
            excludes: Vec::new(),
        }
    }
}
