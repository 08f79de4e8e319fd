//! Authentication errors and their one HTTP mapping.
//!
//! Every token failure other than a storage problem is a 401 with a stable
//! code. Unknown user and wrong password share both status and message so a
//! response never tells which of the two happened.

use axum::http::StatusCode;

use campus_core::{AppError, PasswordError};

use crate::BoxError;
use crate::directory::DirectoryError;
use crate::ledger::LedgerError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid username or password")]
    UserNotFound,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token is malformed")]
    TokenMalformed,

    #[error("Token type is not accepted here")]
    TokenWrongType,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Token is not recognised")]
    TokenNotFound,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error(transparent)]
    Hashing(#[from] PasswordError),

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Storage failure: {0}")]
    Storage(#[source] BoxError),

    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials
            | Self::UserNotFound
            | Self::TokenExpired
            | Self::TokenMalformed
            | Self::TokenWrongType
            | Self::TokenRevoked
            | Self::TokenNotFound => StatusCode::UNAUTHORIZED,
            Self::DuplicateUsername | Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::Hashing(_) | Self::Signing(_) | Self::Storage(_) | Self::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials | Self::UserNotFound => "invalid_credentials",
            Self::TokenExpired => "token_expired",
            Self::TokenMalformed => "token_malformed",
            Self::TokenWrongType => "token_wrong_type",
            Self::TokenRevoked => "token_revoked",
            Self::TokenNotFound => "token_unknown",
            Self::DuplicateUsername | Self::DuplicateEmail => "duplicate_user",
            Self::Hashing(_) | Self::Signing(_) | Self::Storage(_) | Self::Task(_) => {
                "internal_error"
            }
        }
    }

    /// True for failures of the presented token itself, as opposed to
    /// credential, conflict or infrastructure failures.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            Self::TokenExpired
                | Self::TokenMalformed
                | Self::TokenWrongType
                | Self::TokenRevoked
                | Self::TokenNotFound
        )
    }
}

impl From<LedgerError> for AuthError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound => Self::TokenNotFound,
            LedgerError::Conflict(id) => {
                Self::Storage(format!("token family {} already recorded", id).into())
            }
            LedgerError::Storage(source) => Self::Storage(source),
        }
    }
}

impl From<DirectoryError> for AuthError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DuplicateUsername => Self::DuplicateUsername,
            DirectoryError::DuplicateEmail => Self::DuplicateEmail,
            DirectoryError::Storage(source) => Self::Storage(source),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let status = err.status();
        let code = err.code();
        AppError::new(status, err).with_code(code)
    }
}
