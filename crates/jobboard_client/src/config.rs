//! Client configuration.

use crate::error::{ClientError, ClientResult};
use reqwest::Url;
use std::collections::HashMap;
use std::time::Duration;

/// Endpoint used when none is configured.
pub const DEFAULT_URL: &str = "http://localhost:9000/graphql";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL of the GraphQL endpoint.
    pub url: String,
    /// URL of the login endpoint. Derived from `url` when unset.
    pub login_url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Headers sent with every request.
    pub headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl ClientConfig {
    /// Creates a new config with a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            login_url: None,
            timeout: Duration::from_secs(30),
            headers: HashMap::new(),
        }
    }

    /// Sets the login endpoint.
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = Some(url.into());
        self
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a default header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Returns the login endpoint: the configured one, or `/login` on the
    /// GraphQL endpoint's host.
    pub fn resolved_login_url(&self) -> ClientResult<String> {
        if let Some(url) = &self.login_url {
            return Ok(url.clone());
        }

        let base = Url::parse(&self.url)
            .map_err(|e| ClientError::invalid_url(format!("{}: {}", self.url, e)))?;
        base.join("/login")
            .map(String::from)
            .map_err(|e| ClientError::invalid_url(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config() {
        let config = ClientConfig::new("http://localhost:4000/graphql")
            .timeout(Duration::from_secs(10))
            .header("X-Client", "cli");

        assert_eq!(config.url, "http://localhost:4000/graphql");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.headers.contains_key("X-Client"));
    }

    #[test]
    fn test_login_url_is_derived() {
        let config = ClientConfig::new("http://jobs.example.com:9000/api/graphql");
        assert_eq!(
            config.resolved_login_url().unwrap(),
            "http://jobs.example.com:9000/login"
        );

        let config = config.login_url("http://auth.example.com/session");
        assert_eq!(
            config.resolved_login_url().unwrap(),
            "http://auth.example.com/session"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = ClientConfig::new("not a url").resolved_login_url().unwrap_err();
        assert_eq!(err.code, jobboard_core::ErrorCode::InvalidUrl);
    }

    #[test]
    fn test_default_url() {
        assert_eq!(ClientConfig::default().url, DEFAULT_URL);
    }
}
