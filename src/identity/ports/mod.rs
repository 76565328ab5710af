//! Port contracts for the identity boundary.
//!
//! Ports define infrastructure-agnostic interfaces used by identity services.

pub mod credentials;
pub mod repository;
pub mod revocation;

pub use credentials::{CredentialError, PasswordHasher, TokenIssuer};
pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
pub use revocation::TokenRevocationRepository;
