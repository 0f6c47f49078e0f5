//! Salted password hashes for stored user credentials.

use bcrypt::{BcryptError, non_truncating_hash, non_truncating_verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// The longest password, in bytes, that can be hashed without truncation.
    ///
    /// bcrypt reads at most 72 bytes, one of which is the terminating NUL.
    pub const MAX_PASSWORD_BYTES: usize = 71;

    /// Hash `raw_password` with a random salt and the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::HashingError] if the password could not be hashed,
    /// e.g. `cost` is out of range or the password is longer than [PasswordHash::MAX_PASSWORD_BYTES].
    pub fn new(raw_password: &str, cost: u32) -> Result<Self, Error> {
        match non_truncating_hash(raw_password, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches the stored password.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored string is not a bcrypt hash, or if
    /// `raw_password` is longer than [PasswordHash::MAX_PASSWORD_BYTES].
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        non_truncating_verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
