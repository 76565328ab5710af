//! HMAC-signed JSON Web Token adapter.

use crate::identity::{
    domain::{IssuedToken, TokenClaims, TokenKind, User, UserId},
    ports::{CredentialError, TokenIssuer},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered and private claims carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    kind: String,
    jti: Uuid,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 tokens.
///
/// Expiry is checked against the `now` passed by the caller rather than
/// the system clock.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtTokenIssuer {
    /// Creates an issuer signing with `secret`.
    #[must_use]
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    const fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}

impl std::fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(
        &self,
        user: &User,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, CredentialError> {
        let expires_at = now + self.ttl(kind);
        let claims = Claims {
            sub: user.id().into_inner(),
            kind: kind.as_str().to_owned(),
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| CredentialError::Encoding(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, CredentialError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| CredentialError::InvalidToken(err.to_string()))?;

        let kind = TokenKind::try_from(claims.kind.as_str())
            .map_err(|err| CredentialError::InvalidToken(err.to_string()))?;
        if kind != expected {
            return Err(CredentialError::WrongKind {
                expected: expected.as_str(),
            });
        }
        if now.timestamp() >= claims.exp {
            return Err(CredentialError::Expired);
        }

        let issued_at = DateTime::from_timestamp(claims.iat, 0)
            .ok_or_else(|| CredentialError::InvalidToken("iat out of range".to_owned()))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| CredentialError::InvalidToken("exp out of range".to_owned()))?;
        Ok(TokenClaims {
            subject: UserId::from_uuid(claims.sub),
            kind,
            token_id: claims.jti,
            issued_at,
            expires_at,
        })
    }
}
