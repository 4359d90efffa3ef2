//! Server builder and listener.

use crate::auth::TokenIssuer;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::schema::{build_schema, JobBoardSchema};
use jobboard_core::Store;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// State shared by every connection.
pub(crate) struct AppState {
    pub(crate) config: ServerConfig,
    pub(crate) store: Store,
    pub(crate) schema: JobBoardSchema,
    pub(crate) tokens: TokenIssuer,
}

/// Server builder.
#[derive(Default)]
pub struct ServerBuilder {
    config: ServerConfig,
    store: Option<Store>,
}

impl ServerBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the backing store. Defaults to the seeded in-memory store.
    pub fn store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ServerResult<JobBoardServer> {
        if self.config.jwt_secret.is_empty() {
            return Err(ServerError::Config("JWT secret must not be empty".into()));
        }
        if self.config.uses_default_secret() {
            warn!("Using the built-in development JWT secret");
        }

        let store = self.store.unwrap_or_else(Store::with_seed_data);
        let tokens = TokenIssuer::new(self.config.jwt_secret.as_bytes(), self.config.token_ttl);
        let schema = build_schema(store.clone());

        Ok(JobBoardServer {
            state: Arc::new(AppState {
                config: self.config,
                store,
                schema,
                tokens,
            }),
        })
    }
}

/// The job board server.
pub struct JobBoardServer {
    state: Arc<AppState>,
}

impl JobBoardServer {
    /// Creates a new server builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    /// Returns a reference to the schema.
    pub fn schema(&self) -> &JobBoardSchema {
        &self.state.schema
    }

    /// Returns the token issuer used for logins.
    pub fn tokens(&self) -> &TokenIssuer {
        &self.state.tokens
    }

    /// Binds the configured address and serves until an accept error.
    pub async fn listen(self) -> ServerResult<()> {
        let addr = self.state.config.address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> ServerResult<()> {
        let companies = self.state.store.companies.list().await.len();
        let jobs = self.state.store.jobs.list().await.len();
        info!(companies, jobs, "Store ready");

        crate::http::run_server(listener, self.state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_secret() {
        let result = JobBoardServer::builder()
            .config(ServerConfig::new().jwt_secret(""))
            .build();
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[test]
    fn test_builds_with_defaults() {
        let server = JobBoardServer::builder().build().unwrap();
        assert_eq!(server.config().port, 9000);
        assert!(server.schema().sdl().contains("createJob"));
    }
}
