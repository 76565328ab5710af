//! Account registration, login, and bearer token lifecycle.

use crate::identity::{
    domain::{
        EmailAddress, IdentityDomainError, IssuedToken, PasswordHash, TokenClaims, TokenDigest,
        TokenKind, TokenPair, User, UserAccount, UserId, Username,
    },
    ports::{
        CredentialError, PasswordHasher, TokenIssuer, TokenRevocationRepository, UserRepository,
        UserRepositoryError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for registering an account.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    confirm_password: String,
}

impl RegisterRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Request payload for logging in with email and password.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    /// Creates a login request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Tokens and profile returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Access and refresh tokens.
    pub tokens: TokenPair,
    /// The authenticated user.
    pub user: User,
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountServiceError {
    /// Username, email, or password failed validation.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),

    /// Hashing or signing failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The two password fields differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Another account already uses the username.
    #[error("Username already exists")]
    UsernameTaken,

    /// Another account already uses the email address.
    #[error("Email already registered")]
    EmailTaken,

    /// No account matches the email or identifier.
    #[error("User not found")]
    UserNotFound,

    /// The password does not match the account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The bearer token is malformed, expired, revoked, or of the wrong
    /// kind.
    #[error("Token is invalid or expired")]
    InvalidToken,
}

/// Result type for account service operations.
pub type AccountServiceResult<T> = Result<T, AccountServiceError>;

/// Account and session orchestration service.
pub struct AccountService<U, R, C>
where
    U: UserRepository,
    R: TokenRevocationRepository,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    revocations: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
    clock: Arc<C>,
}

impl<U, R, C> AccountService<U, R, C>
where
    U: UserRepository,
    R: TokenRevocationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub fn new(
        users: Arc<U>,
        revocations: Arc<R>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn TokenIssuer>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            users,
            revocations,
            hasher,
            issuer,
            clock,
        }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::PasswordMismatch`],
    /// [`AccountServiceError::UsernameTaken`],
    /// [`AccountServiceError::EmailTaken`], or
    /// [`AccountServiceError::Domain`] for invalid input.
    pub async fn register(&self, request: RegisterRequest) -> AccountServiceResult<User> {
        if request.password != request.confirm_password {
            return Err(AccountServiceError::PasswordMismatch);
        }
        let username = Username::new(request.username)?;
        let email = EmailAddress::new(request.email)?;
        if request.password.is_empty() {
            return Err(IdentityDomainError::EmptyPassword.into());
        }

        if self.users.username_exists(&username).await? {
            return Err(AccountServiceError::UsernameTaken);
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AccountServiceError::EmailTaken);
        }

        let password_hash = self.hash_password(request.password).await?;
        let user = User::new(username, email, &*self.clock);
        let account = UserAccount::new(user, password_hash);
        self.users.store(&account).await.map_err(|err| match err {
            UserRepositoryError::DuplicateUsername(_) => AccountServiceError::UsernameTaken,
            UserRepositoryError::DuplicateEmail(_) => AccountServiceError::EmailTaken,
            other => other.into(),
        })?;

        let user = account.into_user();
        info!(user_id = %user.id(), username = %user.username(), "account registered");
        Ok(user)
    }

    /// Verifies email and password and issues a token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::UserNotFound`] for an unknown email and
    /// [`AccountServiceError::InvalidCredentials`] for a wrong password.
    pub async fn login(&self, request: LoginRequest) -> AccountServiceResult<Session> {
        let email =
            EmailAddress::new(request.email).map_err(|_| AccountServiceError::UserNotFound)?;
        let account = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AccountServiceError::UserNotFound)?;

        let password_matches = self
            .verify_password(request.password, account.password_hash().clone())
            .await?;
        if !password_matches {
            warn!(user_id = %account.user().id(), "login rejected: wrong password");
            return Err(AccountServiceError::InvalidCredentials);
        }

        let now = self.clock.utc();
        let user = account.into_user();
        let tokens = TokenPair {
            access: self.issuer.issue(&user, TokenKind::Access, now)?,
            refresh: self.issuer.issue(&user, TokenKind::Refresh, now)?,
        };
        info!(user_id = %user.id(), "user logged in");
        Ok(Session { tokens, user })
    }

    /// Exchanges a valid refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::InvalidToken`] when the refresh token
    /// is invalid, expired, revoked, or belongs to a deleted account.
    pub async fn refresh(&self, refresh_token: &str) -> AccountServiceResult<IssuedToken> {
        let claims = self.verify_token(refresh_token, TokenKind::Refresh).await?;
        let account = self
            .users
            .find_by_id(claims.subject)
            .await?
            .ok_or(AccountServiceError::InvalidToken)?;
        let access = self
            .issuer
            .issue(account.user(), TokenKind::Access, self.clock.utc())?;
        debug!(user_id = %claims.subject, "access token refreshed");
        Ok(access)
    }

    /// Resolves the user behind an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::InvalidToken`] when the token is
    /// invalid, expired, revoked, or belongs to a deleted account.
    pub async fn authenticate(&self, access_token: &str) -> AccountServiceResult<User> {
        let claims = self.verify_token(access_token, TokenKind::Access).await?;
        let account = self
            .users
            .find_by_id(claims.subject)
            .await?
            .ok_or(AccountServiceError::InvalidToken)?;
        Ok(account.into_user())
    }

    /// Revokes the access token and, when given, the refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::InvalidToken`] when either token does
    /// not verify or the refresh token belongs to another user.
    pub async fn logout(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> AccountServiceResult<()> {
        let access = self.verify_token(access_token, TokenKind::Access).await?;
        let refresh = match refresh_token {
            Some(token) => {
                let claims = self.verify_token(token, TokenKind::Refresh).await?;
                if claims.subject != access.subject {
                    return Err(AccountServiceError::InvalidToken);
                }
                Some((token, claims))
            }
            None => None,
        };

        self.revocations
            .revoke(&TokenDigest::of(access_token), access.expires_at)
            .await?;
        if let Some((token, claims)) = refresh {
            self.revocations
                .revoke(&TokenDigest::of(token), claims.expires_at)
                .await?;
        }

        let purged = self.revocations.purge_expired(self.clock.utc()).await?;
        debug!(purged, "expired revocations purged");
        info!(user_id = %access.subject, "user logged out");
        Ok(())
    }

    /// Returns the current profile of a user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::UserNotFound`] when the account no
    /// longer exists.
    pub async fn profile(&self, user_id: UserId) -> AccountServiceResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserAccount::into_user)
            .ok_or(AccountServiceError::UserNotFound)
    }

    /// Deletes an account. Memberships and sent messages go with it; tasks
    /// assigned to the user become unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::UserNotFound`] when the account does
    /// not exist.
    pub async fn delete_account(&self, user_id: UserId) -> AccountServiceResult<()> {
        self.users.delete(user_id).await.map_err(|err| match err {
            UserRepositoryError::NotFound(_) => AccountServiceError::UserNotFound,
            other => other.into(),
        })?;
        info!(user_id = %user_id, "account deleted");
        Ok(())
    }

    async fn verify_token(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> AccountServiceResult<TokenClaims> {
        let claims = self
            .issuer
            .verify(token, kind, self.clock.utc())
            .map_err(|err| {
                debug!(error = %err, kind = kind.as_str(), "token rejected");
                AccountServiceError::InvalidToken
            })?;
        if self.revocations.is_revoked(&TokenDigest::of(token)).await? {
            debug!(user_id = %claims.subject, "revoked token presented");
            return Err(AccountServiceError::InvalidToken);
        }
        Ok(claims)
    }

    async fn hash_password(&self, password: String) -> AccountServiceResult<PasswordHash> {
        let hasher = Arc::clone(&self.hasher);
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| CredentialError::Hashing(err.to_string()))??;
        Ok(hash)
    }

    async fn verify_password(
        &self,
        password: String,
        hash: PasswordHash,
    ) -> AccountServiceResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| CredentialError::Hashing(err.to_string()))??;
        Ok(matches)
    }
}
