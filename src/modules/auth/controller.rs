use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use tracing::instrument;
use utoipa::ToSchema;

use campus_auth::{AuthError, TokenClaims};
use campus_core::AppError;

use super::model::{
    LoginRequest, RefreshTokenRequest, SignupRequest, TokenPairResponse, TokensResponse,
    VerifyTokenRequest,
};
use crate::metrics;
use crate::middleware::auth::bearer_token;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

const MAX_DEVICE_LEN: usize = 255;

/// Session label stored with the token family.
fn device_label(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|agent| agent.chars().take(MAX_DEVICE_LEN).collect())
}

/// Create an account and start a session
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = TokensResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, headers, dto), fields(username = %dto.username))]
pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<TokensResponse>), AppError> {
    let (user, pair) = state
        .auth
        .signup(&dto.email, &dto.username, &dto.password, device_label(&headers))
        .await?;

    metrics::track_tokens_issued("signup");
    Ok((StatusCode::CREATED, Json(TokensResponse::new(user, pair))))
}

/// Log in with a username or email and a password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokensResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, headers, dto), fields(username = %dto.username))]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<TokensResponse>, AppError> {
    let result = state
        .auth
        .login(&dto.username, &dto.password, device_label(&headers))
        .await;

    let (user, pair) = result.map_err(|err: AuthError| {
        let reason = match &err {
            AuthError::UserNotFound => "unknown_user",
            AuthError::InvalidCredentials => "wrong_password",
            _ => err.code(),
        };
        metrics::track_login_failure(reason);
        err
    })?;

    metrics::track_tokens_issued("login");
    Ok(Json(TokensResponse::new(user, pair)))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token; the refresh token is returned unchanged", body = TokenPairResponse),
        (status = 401, description = "Refresh token rejected", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<TokenPairResponse>, AppError> {
    let pair = state.auth.refresh(&dto.refresh_token).await?;

    metrics::track_token_refreshed();
    Ok(Json(pair.into()))
}

/// End the session of the bearer token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session ended"),
        (status = 400, description = "Malformed authorization header", body = ErrorResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = bearer_token(&headers)?;
    state.auth.logout(token).await?;

    metrics::track_tokens_revoked();
    Ok(StatusCode::NO_CONTENT)
}

/// Revoke the token family of a refresh token
#[utoipa::path(
    post,
    path = "/api/auth/revoke",
    request_body = RefreshTokenRequest,
    responses(
        (status = 204, description = "Token family revoked"),
        (status = 401, description = "Refresh token rejected", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn revoke(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<StatusCode, AppError> {
    state.auth.revoke(&dto.refresh_token).await?;

    metrics::track_tokens_revoked();
    Ok(StatusCode::NO_CONTENT)
}

/// Check an access token and return its claims
#[utoipa::path(
    post,
    path = "/api/auth/verify",
    request_body = VerifyTokenRequest,
    responses(
        (status = 200, description = "Token is valid", body = TokenClaims),
        (status = 401, description = "Token rejected", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn verify(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerifyTokenRequest>,
) -> Result<Json<TokenClaims>, AppError> {
    let claims = state.auth.verify(&dto.token).await?;
    Ok(Json(claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_device_label_from_user_agent() {
        let mut headers = HeaderMap::new();
        assert_eq!(device_label(&headers), None);

        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        assert_eq!(device_label(&headers).as_deref(), Some("curl/8.0"));

        let long = "x".repeat(MAX_DEVICE_LEN + 10);
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&long).unwrap());
        assert_eq!(device_label(&headers).unwrap().len(), MAX_DEVICE_LEN);
    }
}
