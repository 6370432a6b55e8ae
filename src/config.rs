//! API configuration loaded from the environment

use std::env;

use tracing::{info, warn};

/// Default Sky Scrapper endpoint on RapidAPI
pub const DEFAULT_BASE_URL: &str = "https://sky-scrapper.p.rapidapi.com/api/v1";

/// Default RapidAPI host header value
pub const DEFAULT_API_HOST: &str = "sky-scrapper.p.rapidapi.com";

/// Connection settings for the Sky Scrapper API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_host: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, api_host: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            api_host: api_host.into(),
        }
    }

    /// Read configuration from `SKY_SCRAPPER_BASE_URL`, `RAPID_API_KEY`
    /// and `SKY_SCRAPPER_HOST`, falling back to the public endpoint.
    /// A missing key is reported but not fatal here; requests will fail
    /// with an API error instead.
    pub fn from_env() -> Self {
        let base_url = env::var("SKY_SCRAPPER_BASE_URL").unwrap_or_else(|_| {
            info!("SKY_SCRAPPER_BASE_URL not set, using default: {DEFAULT_BASE_URL}");
            DEFAULT_BASE_URL.to_string()
        });
        let api_key = env::var("RAPID_API_KEY").unwrap_or_else(|_| {
            warn!("RAPID_API_KEY not set, API requests will be rejected");
            String::new()
        });
        let api_host = env::var("SKY_SCRAPPER_HOST").unwrap_or_else(|_| {
            info!("SKY_SCRAPPER_HOST not set, using default: {DEFAULT_API_HOST}");
            DEFAULT_API_HOST.to_string()
        });

        Self {
            base_url,
            api_key,
            api_host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config() {
        let config = ApiConfig::new("http://localhost:9000/api/v1", "key", "localhost");
        assert_eq!(config.base_url, "http://localhost:9000/api/v1");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.api_host, "localhost");
    }
}
