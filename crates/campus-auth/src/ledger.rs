//! The refresh-token ledger contract.
//!
//! The ledger is the only authority on whether a token family is still live.
//! Implementations must be safe to share between request tasks; each
//! operation is a single atomic step against the backing store.

use std::future::Future;

use sha2::{Digest, Sha256};

use campus_models::TokenFamilyId;
pub use campus_models::RefreshTokenEntry;

use crate::BoxError;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Token family not found")]
    NotFound,

    #[error("Token family {0} already exists")]
    Conflict(TokenFamilyId),

    #[error("Ledger storage failure: {0}")]
    Storage(#[source] BoxError),
}

pub trait RefreshTokenLedger: Send + Sync {
    /// Records a new family. Fails with [`LedgerError::Conflict`] if the id is
    /// already present.
    fn insert(
        &self,
        entry: &RefreshTokenEntry,
    ) -> impl Future<Output = Result<(), LedgerError>> + Send;

    /// Fails with [`LedgerError::NotFound`] for an unknown id.
    fn find_by_id(
        &self,
        id: TokenFamilyId,
    ) -> impl Future<Output = Result<RefreshTokenEntry, LedgerError>> + Send;

    /// Marks a family revoked. Revoking an already revoked family succeeds and
    /// keeps the original `revoked_at`. Fails with [`LedgerError::NotFound`]
    /// for an unknown id.
    fn revoke(&self, id: TokenFamilyId) -> impl Future<Output = Result<(), LedgerError>> + Send;
}

/// SHA-256 fingerprint of a refresh token, hex encoded.
pub fn token_fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let a = token_fingerprint("header.payload.signature");
        let b = token_fingerprint("header.payload.signature");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, token_fingerprint("header.payload.signaturf"));
    }

    #[test]
    fn test_fingerprint_known_value() {
        assert_eq!(
            token_fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
