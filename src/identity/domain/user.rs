//! User aggregate and stored credentials.

use super::{EmailAddress, UserId, Username};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Registered user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    first_name: String,
    last_name: String,
    date_joined: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted username.
    pub username: Username,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted given name, possibly empty.
    pub first_name: String,
    /// Persisted family name, possibly empty.
    pub last_name: String,
    /// Persisted registration timestamp.
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Creates a newly registered user with empty names.
    #[must_use]
    pub fn new(username: Username, email: EmailAddress, clock: &impl Clock) -> Self {
        Self {
            id: UserId::new(),
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            date_joined: clock.utc(),
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            date_joined: data.date_joined,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn date_joined(&self) -> DateTime<Utc> {
        self.date_joined
    }
}

/// Encoded password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an encoded hash produced by a password hasher.
    #[must_use]
    pub const fn new(encoded: String) -> Self {
        Self(encoded)
    }

    /// Returns the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// A user together with the credential used to authenticate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    user: User,
    password_hash: PasswordHash,
}

impl UserAccount {
    /// Pairs a user with their password hash.
    #[must_use]
    pub const fn new(user: User, password_hash: PasswordHash) -> Self {
        Self {
            user,
            password_hash,
        }
    }

    /// Returns the user profile.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Returns the stored password hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Consumes the account, returning the user profile.
    #[must_use]
    pub fn into_user(self) -> User {
        self.user
    }
}
