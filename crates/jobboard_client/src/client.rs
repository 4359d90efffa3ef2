//! GraphQL client core.
//!
//! Requests flow through a middleware chain before reaching the HTTP
//! transport. Query results pass through the [`QueryCache`] according to
//! the [`FetchPolicy`] of each call.

use crate::cache::{CacheKey, FetchPolicy, QueryCache};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::operations::{OperationKind, TypedOperation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// Future returned by middlewares and by [`Next`].
pub type MiddlewareFuture = Pin<Box<dyn Future<Output = ClientResult<Response>> + Send>>;

/// Middleware function type.
pub type Middleware = Arc<dyn Fn(Request, Next) -> MiddlewareFuture + Send + Sync>;

/// Next middleware in the chain.
pub type Next = Arc<dyn Fn(Request) -> MiddlewareFuture + Send + Sync>;

/// A GraphQL request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

/// A GraphQL response.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub data: Option<serde_json::Value>,
    pub errors: Option<Vec<GraphQLError>>,
}

impl Response {
    /// Returns the data, or the aggregated error if any error was reported.
    pub fn into_data(self) -> ClientResult<serde_json::Value> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            return Err(ClientError::from_graphql(&errors));
        }
        self.data
            .filter(|d| !d.is_null())
            .ok_or_else(ClientError::no_data)
    }
}

/// A GraphQL error.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
}

/// HTTP transport.
struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    fn new(config: &ClientConfig) -> ClientResult<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { inner })
    }

    async fn post(&self, url: &str, request: &Request) -> ClientResult<Response> {
        let mut builder = self.inner.post(url).json(request);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<Response>(&body) {
            Ok(parsed) if status.is_success() => Ok(parsed),
            // Rejections such as a bad token still carry a GraphQL error body.
            Ok(parsed) => match parsed.errors.filter(|e| !e.is_empty()) {
                Some(errors) => Err(ClientError {
                    code: ClientError::http(status.as_u16(), "").code,
                    ..ClientError::from_graphql(&errors)
                }),
                None => Err(ClientError::http(
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Request failed"),
                )),
            },
            Err(_) if !status.is_success() => Err(ClientError::http(
                status.as_u16(),
                String::from_utf8_lossy(&body[..body.len().min(200)]),
            )),
            Err(e) => Err(ClientError::deserialize(format!(
                "Failed to parse response: {}",
                e
            ))),
        }
    }
}

/// The GraphQL client.
#[derive(Clone)]
pub struct GraphQLClient {
    config: Arc<ClientConfig>,
    http: Arc<HttpClient>,
    middlewares: Vec<Middleware>,
    cache: QueryCache,
}

impl GraphQLClient {
    /// Creates a new client with the given URL.
    pub fn new(url: impl Into<String>) -> ClientResult<Self> {
        Self::with_config(ClientConfig::new(url))
    }

    /// Creates a new client with configuration.
    pub fn with_config(config: ClientConfig) -> ClientResult<Self> {
        let http = HttpClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            http: Arc::new(http),
            middlewares: Vec::new(),
            cache: QueryCache::new(),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the result cache.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http.inner
    }

    /// Adds a middleware. Middlewares run in the order they were added.
    pub fn use_middleware<F>(mut self, middleware: F) -> Self
    where
        F: Fn(Request, Next) -> MiddlewareFuture + Send + Sync + 'static,
    {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Sends a request straight to the transport.
    pub async fn execute_raw(&self, request: Request) -> ClientResult<Response> {
        self.http.post(&self.config.url, &request).await
    }

    /// Sends a request through the middleware chain.
    pub async fn execute(&self, request: Request) -> ClientResult<Response> {
        if self.middlewares.is_empty() {
            return self.execute_raw(request).await;
        }

        // Build middleware chain from the end
        let client = self.clone();
        let final_handler: Next = Arc::new(move |req| {
            let client = client.clone();
            Box::pin(async move { client.execute_raw(req).await })
        });

        let mut next = final_handler;
        for middleware in self.middlewares.iter().rev() {
            let mw = middleware.clone();
            let current_next = next;
            next = Arc::new(move |req| {
                let mw = mw.clone();
                let next = current_next.clone();
                Box::pin(async move { mw(req, next).await })
            });
        }

        next(request).await
    }

    fn build_request<Op: TypedOperation>(
        &self,
        variables: &Op::Variables,
    ) -> ClientResult<Request> {
        let variables =
            serde_json::to_value(variables).map_err(|e| ClientError::serialize(e.to_string()))?;
        Ok(Request {
            query: Op::OPERATION.to_string(),
            variables: Some(variables).filter(|v| !v.is_null()),
            operation_name: Some(Op::OPERATION_NAME.to_string()),
            headers: self.config.headers.clone(),
        })
    }

    /// Runs a typed query under `policy`.
    pub async fn query<Op: TypedOperation>(
        &self,
        variables: &Op::Variables,
        policy: FetchPolicy,
    ) -> ClientResult<Op::Response> {
        debug_assert_eq!(Op::KIND, OperationKind::Query);
        let key = CacheKey::new::<Op>(variables)?;

        if policy == FetchPolicy::CacheFirst {
            if let Some(cached) = self.cache.get(&key).await {
                debug!(operation = Op::OPERATION_NAME, "Cache hit");
                return decode(cached);
            }
        }

        let data = self
            .execute(self.build_request::<Op>(variables)?)
            .await?
            .into_data()?;

        if policy != FetchPolicy::NoCache {
            self.cache.insert(key, data.clone()).await;
        }
        decode(data)
    }

    /// Runs a typed mutation. Mutation results are never cached.
    pub async fn mutate<Op: TypedOperation>(
        &self,
        variables: &Op::Variables,
    ) -> ClientResult<Op::Response> {
        debug_assert_eq!(Op::KIND, OperationKind::Mutation);
        let data = self
            .execute(self.build_request::<Op>(variables)?)
            .await?
            .into_data()?;
        decode(data)
    }
}

fn decode<T: DeserializeOwned>(data: serde_json::Value) -> ClientResult<T> {
    serde_json::from_value(data)
        .map_err(|e| ClientError::deserialize(format!("Failed to deserialize response: {}", e)))
}
