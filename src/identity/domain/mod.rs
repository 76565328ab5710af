//! Domain model for user accounts and bearer tokens.

mod error;
mod ids;
mod token;
mod user;

pub use error::IdentityDomainError;
pub use ids::{EmailAddress, UserId, Username};
pub use token::{IssuedToken, ParseTokenKindError, TokenClaims, TokenDigest, TokenKind, TokenPair};
pub use user::{PasswordHash, PersistedUserData, User, UserAccount};
