//! Ledger rows for refresh-token families.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::ids::{TokenFamilyId, UserId};

/// One stored token family.
///
/// `id` equals the `tid` claim of both tokens in the family. `token_hash` is
/// a fingerprint of the refresh token, never the token itself. A non-null
/// `revoked_at` is terminal.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenEntry {
    pub id: TokenFamilyId,
    pub user_id: UserId,
    pub token_hash: String,
    pub device: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenEntry {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
