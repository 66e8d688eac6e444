use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler limits
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_limit("downloaders", config.downloaders)?;
    validate_limit("extractors", config.extractors)?;
    validate_limit("per-host", config.per_host)?;
    Ok(())
}

fn validate_limit(name: &str, value: usize) -> Result<(), ConfigError> {
    if value < 1 || value > 1024 {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and 1024, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic email shape check: one '@' with a dotted domain after it
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "contact-email does not look like an email address: '{}'",
            email
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_downloaders_rejected() {
        let mut config = Config::default();
        config.crawler.downloaders = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_extractors_rejected() {
        let mut config = Config::default();
        config.crawler.extractors = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_per_host_rejected() {
        let mut config = Config::default();
        config.crawler.per_host = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_oversized_limit_rejected() {
        let mut config = Config::default();
        config.crawler.downloaders = 100_000;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_crawler_name_charset() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "my crawler".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = "my-crawler-2".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_contact_url_rejected() {
        let mut config = Config::default();
        config.user_agent.contact_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut config = Config::default();
        config.user_agent.contact_email = "nobody".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.contact_email = "nobody@nowhere".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.contact_email = "nobody@nowhere.example".to_string();
        assert!(validate(&config).is_ok());
    }
}
