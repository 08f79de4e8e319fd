use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use campus_auth::TokenPair;
use campus_models::User;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 255, message = "username must be 3 to 255 characters"))]
    #[validate(custom(function = "validate_username_format"))]
    pub username: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 255, message = "password must be 8 to 255 characters"))]
    pub password: String,
}

/// Login treats any identifier containing `@` as an email, so usernames may
/// not contain one. Surrounding whitespace is rejected rather than trimmed so
/// the length rule sees the stored value.
fn validate_username_format(username: &str) -> Result<(), ValidationError> {
    let message = if username.contains('@') {
        "username must not contain '@'"
    } else if username.trim() != username {
        "username must not start or end with whitespace"
    } else {
        return Ok(());
    };

    let mut error = ValidationError::new("username_format");
    error.message = Some(message.into());
    Err(error)
}

/// `username` may also be an email address.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, max = 255, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyTokenRequest {
    #[validate(length(min = 1, message = "token is required"))]
    pub token: String,
}

/// Both tokens of a family. Expiry times are Unix seconds.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub access_token_expires_at: i64,
    pub refresh_token: String,
    pub refresh_token_expires_at: i64,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            access_token_expires_at: pair.access_expires_at.timestamp(),
            refresh_token: pair.refresh_token,
            refresh_token_expires_at: pair.refresh_expires_at.timestamp(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokensResponse {
    #[serde(flatten)]
    pub tokens: TokenPairResponse,
    pub user: User,
}

impl TokensResponse {
    pub fn new(user: User, pair: TokenPair) -> Self {
        Self {
            tokens: pair.into(),
            user,
        }
    }
}
