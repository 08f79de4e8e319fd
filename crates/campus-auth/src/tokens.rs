//! Token lifecycle: issue, refresh, validate and revoke token families.
//!
//! [`TokenService`] is the only writer of the refresh-token ledger. A family
//! is `Active` from the moment its ledger row exists until it is revoked
//! (terminal, stored) or its refresh token expires (terminal, implicit).
//! Nothing is cached: every validation and refresh re-reads the ledger, so a
//! revocation is seen by the very next request.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::instrument;

use campus_models::{RefreshTokenEntry, TokenFamilyId, UserId};

use crate::claims::{TokenClaims, TokenType};
use crate::error::AuthError;
use crate::jwt::TokenCodec;
use crate::ledger::{LedgerError, RefreshTokenLedger, token_fingerprint};

/// An access token and a refresh token from the same family.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
    pub family_id: TokenFamilyId,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .field("family_id", &self.family_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct TokenService<L> {
    codec: TokenCodec,
    ledger: L,
}

impl<L: RefreshTokenLedger> TokenService<L> {
    pub fn new(codec: TokenCodec, ledger: L) -> Self {
        Self { codec, ledger }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Starts a new family for `user_id`.
    ///
    /// Both tokens share one `iat`. The pair is returned only once its ledger
    /// row is stored; if the insert fails the signed tokens are dropped.
    #[instrument(skip(self, username, email))]
    pub async fn issue_pair(
        &self,
        user_id: UserId,
        username: &str,
        email: &str,
        device: Option<String>,
    ) -> Result<TokenPair, AuthError> {
        let family_id = TokenFamilyId::new();
        let now = Utc::now();
        let subject = user_id.to_string();

        let access = self.codec.issue_at(
            TokenType::Access,
            &subject,
            username,
            email,
            family_id,
            now,
        )?;
        let refresh = self.codec.issue_at(
            TokenType::Refresh,
            &subject,
            username,
            email,
            family_id,
            now,
        )?;

        let entry = RefreshTokenEntry {
            id: family_id,
            user_id,
            token_hash: token_fingerprint(&refresh.token),
            device,
            expires_at: refresh.expires_at,
            created_at: now,
            revoked_at: None,
        };

        if let Err(err) = self.ledger.insert(&entry).await {
            if let LedgerError::Conflict(id) = &err {
                tracing::error!(family_id = %id, "Freshly generated token family already in ledger");
            }
            return Err(err.into());
        }

        tracing::debug!(family_id = %family_id, "Issued token pair");

        Ok(TokenPair {
            access_token: access.token,
            access_expires_at: access.expires_at,
            refresh_token: refresh.token,
            refresh_expires_at: refresh.expires_at,
            family_id,
        })
    }

    /// Issues a new access token in the family of `refresh_token`.
    ///
    /// The refresh token itself is not rotated: the returned pair carries the
    /// presented token unchanged, usable until it expires or its family is
    /// revoked. The new access token never outlives the family.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        let claims = self.codec.parse_at(refresh_token, TokenType::Refresh, now)?;
        let entry = self.live_entry(&claims, now).await?;

        if entry.token_hash != token_fingerprint(refresh_token) {
            tracing::warn!(family_id = %entry.id, "Refresh token does not match its family");
            return Err(AuthError::TokenNotFound);
        }

        let access = self
            .codec
            .reissue_access_at(&claims, now, entry.expires_at)?;

        Ok(TokenPair {
            access_token: access.token,
            access_expires_at: access.expires_at,
            refresh_token: refresh_token.to_string(),
            refresh_expires_at: entry.expires_at,
            family_id: claims.tid,
        })
    }

    /// Checks an access token and the liveness of its family.
    #[instrument(skip_all)]
    pub async fn validate(&self, access_token: &str) -> Result<TokenClaims, AuthError> {
        let now = Utc::now();
        let claims = self.codec.parse_at(access_token, TokenType::Access, now)?;
        self.live_entry(&claims, now).await?;
        Ok(claims)
    }

    /// Revokes the family of `refresh_token`. Revoking twice is not an error.
    #[instrument(skip_all)]
    pub async fn revoke(&self, refresh_token: &str) -> Result<TokenFamilyId, AuthError> {
        let claims = self.codec.parse(refresh_token, TokenType::Refresh)?;
        self.revoke_family(&claims).await
    }

    /// Ends the session the presented token belongs to.
    ///
    /// Accepts the refresh token or, failing that, an access token of the same
    /// family. Either way the whole family is revoked.
    #[instrument(skip_all)]
    pub async fn revoke_session(&self, token: &str) -> Result<TokenFamilyId, AuthError> {
        let claims = match self.codec.parse(token, TokenType::Refresh) {
            Err(AuthError::TokenWrongType) => self.codec.parse(token, TokenType::Access)?,
            other => other?,
        };
        self.revoke_family(&claims).await
    }

    async fn revoke_family(&self, claims: &TokenClaims) -> Result<TokenFamilyId, AuthError> {
        let entry = self.ledger.find_by_id(claims.tid).await?;
        if entry.user_id != claims.user_id()? {
            return Err(AuthError::TokenNotFound);
        }

        self.ledger.revoke(claims.tid).await?;
        tracing::info!(family_id = %claims.tid, "Revoked token family");
        Ok(claims.tid)
    }

    async fn live_entry(
        &self,
        claims: &TokenClaims,
        now: DateTime<Utc>,
    ) -> Result<RefreshTokenEntry, AuthError> {
        let entry = self.ledger.find_by_id(claims.tid).await?;

        if entry.is_revoked() {
            return Err(AuthError::TokenRevoked);
        }
        if entry.user_id != claims.user_id()? {
            return Err(AuthError::TokenNotFound);
        }
        if entry.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }

        Ok(entry)
    }
}
