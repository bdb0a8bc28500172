//! Data gateway for the backend-as-a-service project.
//!
//! Typed access to the six relational tables over the REST endpoint, the
//! three storage buckets, and the auth endpoints. All calls go through one
//! shared [`BackendClient`].

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod repositories;
pub mod storage;

pub use auth::{AuthApi, AuthUser, Session, SignUpOutcome};
pub use client::{BackendClient, Table};
pub use config::BackendConfig;
pub use error::DbError;
pub use query::Query;
pub use storage::{ObjectStorage, StorageBucket, StorageError};
