use anyhow::anyhow;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use campus_auth::TokenClaims;
use campus_core::AppError;

use crate::state::AppState;

/// Pulls the token out of `Authorization: Bearer <token>`.
///
/// A missing header is a 401. A header that is present but not exactly
/// `Bearer <non-empty token>` is a 400.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers.get(header::AUTHORIZATION).ok_or_else(|| {
        AppError::unauthorized(anyhow!("Missing authorization header")).with_code("missing_token")
    })?;

    let malformed = || {
        AppError::bad_request(anyhow!("Invalid authorization header format"))
            .with_code("malformed_authorization")
    };

    let token = value
        .to_str()
        .map_err(|_| malformed())?
        .strip_prefix("Bearer ")
        .ok_or_else(malformed)?;

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(malformed());
    }

    Ok(token)
}

/// Extractor that validates a bearer access token, including its family's
/// ledger entry, and provides the token claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub TokenClaims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = state.auth.verify(token).await?;
        Ok(AuthUser(claims))
    }
}
