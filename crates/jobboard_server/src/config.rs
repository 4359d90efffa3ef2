//! Server configuration.

use std::time::Duration;

/// Secret used when none is configured. Only suitable for local development.
pub const DEFAULT_JWT_SECRET: &str = "jobboard-development-secret";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Serve GraphiQL on `GET /graphql`.
    pub playground: bool,
    /// HMAC secret for signing access tokens.
    pub jwt_secret: String,
    /// Lifetime of issued access tokens.
    pub token_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerConfig {
    /// Path of the GraphQL endpoint.
    pub const GRAPHQL_PATH: &'static str = "/graphql";
    /// Path of the login endpoint.
    pub const LOGIN_PATH: &'static str = "/login";

    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9000,
            playground: true,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Sets the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Disables the playground.
    pub fn no_playground(mut self) -> Self {
        self.playground = false;
        self
    }

    /// Sets the token signing secret.
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    /// Sets the token lifetime.
    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Returns `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_configuration() {
        let config = ServerConfig::new()
            .port(8080)
            .host("0.0.0.0")
            .no_playground()
            .jwt_secret("s3cret")
            .token_ttl(Duration::from_secs(60));

        assert_eq!(config.address(), "0.0.0.0:8080");
        assert!(!config.playground);
        assert!(!config.uses_default_secret());
        assert_eq!(config.token_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 9000);
        assert!(config.playground);
        assert!(config.uses_default_secret());
    }
}
