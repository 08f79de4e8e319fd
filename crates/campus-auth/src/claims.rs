//! Claims carried inside every signed token.
//!
//! Access and refresh tokens share one claim layout and differ only in the
//! `typ` tag and their lifetime. The tag is checked on every parse so that a
//! refresh token can never stand in for an access token, and vice versa.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use campus_models::{TokenFamilyId, UserId};

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded token payload.
///
/// # Fields
///
/// - `sub`: User ID (subject)
/// - `username`, `email`: identity at issuance time
/// - `tid`: token family shared with the sibling token
/// - `typ`: `access` or `refresh`
/// - `exp`, `iat`: Unix timestamps in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenClaims {
    /// User ID (subject claim)
    pub sub: String,
    pub username: String,
    pub email: String,
    /// Token family ID
    #[schema(value_type = String, format = "uuid")]
    pub tid: TokenFamilyId,
    pub typ: TokenType,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
    /// Issued-at timestamp (Unix seconds)
    pub iat: i64,
}

impl TokenClaims {
    /// Subject as a typed user id. A subject that is not a UUID cannot come
    /// from our own signer, so it is reported as a malformed token.
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub.parse().map_err(|_| AuthError::TokenMalformed)
    }

    pub fn family_id(&self) -> TokenFamilyId {
        self.tid
    }
}
