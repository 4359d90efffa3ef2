//! Job board GraphQL server.
//!
//! Maps the job board schema onto the in-memory store:
//! - `schema`: Query, Mutation, Job and Company resolvers
//! - `auth`: Bearer token issuing and verification
//! - `config`: Server configuration
//! - `server`: Server builder and listener
//!
//! # Example
//!
//! ```ignore
//! use jobboard_core::Store;
//! use jobboard_server::{JobBoardServer, ServerConfig};
//!
//! JobBoardServer::builder()
//!     .config(ServerConfig::new().port(9000))
//!     .store(Store::with_seed_data())
//!     .build()?
//!     .listen()
//!     .await
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub(crate) mod http;
pub mod schema;
pub mod server;

pub use auth::{Claims, CurrentUser, TokenIssuer};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use schema::{build_schema, JobBoardSchema};
pub use server::{JobBoardServer, ServerBuilder};
