//! Credential Service client library
//!
//! This crate owns the boundary to the hosted authentication provider:
//! the `Identity` entity, the closed `CredentialError` classification,
//! the `CredentialService` trait, and a REST-backed implementation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod identity;
pub mod rest;
pub mod service;
pub mod test_utils;

pub use error::CredentialError;
pub use identity::{Identity, IdentityPatch};
pub use rest::{AuthClientConfig, RestAuthClient};
pub use service::CredentialService;

/// Result type for credential service operations
pub type Result<T> = std::result::Result<T, CredentialError>;
