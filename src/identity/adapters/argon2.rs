//! Argon2id password hashing adapter.

use crate::identity::{
    domain::PasswordHash,
    ports::{CredentialError, PasswordHasher},
};
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

const SALT_LENGTH: usize = 16;

/// Argon2id password hasher.
///
/// [`Default`] uses the crate's recommended cost parameters. Tests build a
/// cheaper instance with [`Argon2PasswordHasher::with_params`].
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with explicit memory (KiB), iteration, and
    /// parallelism costs.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hashing`] when the parameters are out of
    /// range.
    pub fn with_params(
        memory_cost: u32,
        time_cost: u32,
        parallelism: u32,
    ) -> Result<Self, CredentialError> {
        let params = Params::new(memory_cost, time_cost, parallelism, None)
            .map_err(|err| CredentialError::Hashing(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError> {
        let mut salt_bytes = [0_u8; SALT_LENGTH];
        rand::rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| CredentialError::Hashing(err.to_string()))?;

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| PasswordHash::new(hash.to_string()))
            .map_err(|err| CredentialError::Hashing(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialError> {
        let parsed = PhcHash::new(hash.as_str())
            .map_err(|err| CredentialError::Hashing(err.to_string()))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
