//! Signing and parsing of access and refresh tokens.
//!
//! Tokens are HS256 JWTs signed with the configured secret. The codec is
//! built once from an immutable [`JwtConfig`] and shared; it holds no other
//! state, so issuing is deterministic for a given input and clock.
//!
//! Parsing reports three distinct failures:
//!
//! - [`AuthError::TokenMalformed`]: bad structure, bad signature or bad claims
//! - [`AuthError::TokenExpired`]: `exp <= now`, with no leeway
//! - [`AuthError::TokenWrongType`]: the `typ` tag is not the one expected
//!
//! # Example
//!
//! ```ignore
//! let codec = TokenCodec::new(&jwt_config);
//! let family = TokenFamilyId::new();
//!
//! let issued = codec.issue(TokenType::Access, &user_id, "alice", "a@b.com", family)?;
//! let claims = codec.parse(&issued.token, TokenType::Access)?;
//! assert_eq!(claims.tid, family);
//! ```

use std::fmt;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use campus_config::JwtConfig;
use campus_models::TokenFamilyId;

use crate::claims::{TokenClaims, TokenType};
use crate::error::AuthError;

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is enforced in `parse_at` so it can be told apart from other
        // failures and compared without leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: TimeDelta::seconds(config.access_token_expiry),
            refresh_ttl: TimeDelta::seconds(config.refresh_token_expiry),
        }
    }

    pub fn ttl(&self, token_type: TokenType) -> TimeDelta {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        }
    }

    pub fn issue(
        &self,
        token_type: TokenType,
        subject: &str,
        username: &str,
        email: &str,
        family_id: TokenFamilyId,
    ) -> Result<IssuedToken, AuthError> {
        self.issue_at(token_type, subject, username, email, family_id, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        token_type: TokenType,
        subject: &str,
        username: &str,
        email: &str,
        family_id: TokenFamilyId,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        // Claims carry whole seconds; keep `expires_at` equal to `exp`.
        let now = now.trunc_subsecs(0);
        let expires_at = now + self.ttl(token_type);

        let claims = TokenClaims {
            sub: subject.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            tid: family_id,
            typ: token_type,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Issues a new access token for the identity and family in `claims`.
    ///
    /// The token expires after the access TTL or at `not_after`, whichever
    /// comes first.
    pub fn reissue_access_at(
        &self,
        claims: &TokenClaims,
        now: DateTime<Utc>,
        not_after: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let now = now.trunc_subsecs(0);
        let expires_at = (now + self.access_ttl).min(not_after.trunc_subsecs(0));

        let claims = TokenClaims {
            typ: TokenType::Access,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            ..claims.clone()
        };

        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, expires_at })
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }

    pub fn parse(&self, token: &str, expected: TokenType) -> Result<TokenClaims, AuthError> {
        self.parse_at(token, expected, Utc::now())
    }

    /// Parses a token as if the current time were `now`.
    pub fn parse_at(
        &self,
        token: &str,
        expected: TokenType,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, AuthError> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected token");
                AuthError::TokenMalformed
            })?;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }

        if claims.typ != expected {
            return Err(AuthError::TokenWrongType);
        }

        Ok(claims)
    }
}
