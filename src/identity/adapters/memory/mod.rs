//! In-memory adapters for accounts and revoked tokens.

mod revocation;
mod user;

pub use revocation::InMemoryTokenRevocations;
pub use user::InMemoryUserRepository;
