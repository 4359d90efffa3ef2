//! Core types for the job board.
//!
//! This crate provides the pieces shared by the server and the client:
//! - `entities`: Job, Company and User records
//! - `error`: Typed error codes and domain errors
//! - `store`: Repository traits and the in-memory store

pub mod entities;
pub mod error;
pub mod store;

pub use entities::{Company, CompanyId, Job, JobId, NewJob, User, UserId};
pub use error::{DomainError, DomainResult, ErrorCode};
pub use store::{
    CompanyRepository, InMemoryCompanyRepository, InMemoryJobRepository,
    InMemoryUserRepository, JobRepository, Store, UserRepository,
};
