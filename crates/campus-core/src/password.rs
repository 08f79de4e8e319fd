//! Credential hashing.
//!
//! Passwords are hashed with bcrypt at [`bcrypt::DEFAULT_COST`]. The cost is
//! a compile-time constant; raising it requires a redeploy, and existing
//! hashes keep verifying because the cost is encoded in each hash.

use std::sync::OnceLock;

use bcrypt::{DEFAULT_COST, hash, verify};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(#[source] bcrypt::BcryptError),

    #[error("Failed to verify password: {0}")]
    Verify(#[source] bcrypt::BcryptError),
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash(password, DEFAULT_COST).map_err(PasswordError::Hash)
}

/// Compares `password` against a stored bcrypt hash using bcrypt's own
/// verification routine.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    verify(password, hash).map_err(PasswordError::Verify)
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// A valid hash at the production cost that matches no real account.
///
/// Verifying against it when a login names an unknown user makes that path
/// cost the same as a wrong password. The first call pays for one bcrypt hash,
/// so call it from a blocking context (or once at startup). A failed attempt
/// is not cached.
pub fn dummy_hash() -> Result<&'static str, PasswordError> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password("campus:unknown-account")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}
