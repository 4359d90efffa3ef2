//! Job board client.
//!
//! A thin GraphQL client with:
//! - An auth link that attaches the session's bearer token
//! - An in-memory result cache with per-query fetch policies
//! - Typed operations for the job board documents
//!
//! # Example
//!
//! ```ignore
//! use jobboard_client::{ClientConfig, CreateJobInput, JobBoardClient};
//!
//! let client = JobBoardClient::new(ClientConfig::new("http://localhost:9000/graphql"))?;
//! client.login("alice@facegle.com", "alice123").await?;
//!
//! let job = client
//!     .create_job(CreateJobInput::new("Rust Engineer").description("Remote"))
//!     .await?;
//!
//! // Served from the cache seeded by create_job.
//! let same = client.load_job(&job.id).await?;
//! ```

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod operations;
pub mod requests;

pub use auth::{auth_link, Session};
pub use cache::{CacheKey, FetchPolicy, QueryCache};
pub use client::{
    GraphQLClient, GraphQLError, Middleware, MiddlewareFuture, Next, Request, Response,
};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use operations::{
    CompanyDetail, CompanyJob, CompanyRef, CreateJobInput, JobDetail, JobSummary, NoVariables,
    OperationKind, TypedOperation,
};
pub use requests::JobBoardClient;
