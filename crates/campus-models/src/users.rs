//! User records as seen by the auth core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::UserId;

/// A user account. Safe to return to clients: it never holds the password
/// hash.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user together with its stored password hash.
///
/// Deliberately not `Serialize`; it only flows from the user directory into
/// the login path.
#[derive(FromRow, Clone)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Data needed to create an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Field used to find a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Id(UserId),
    Username(String),
    Email(String),
}

impl UserLookup {
    /// Treats identifiers containing `@` as emails, anything else as a
    /// username.
    pub fn from_login(identifier: &str) -> Self {
        let identifier = identifier.trim();
        if identifier.contains('@') {
            Self::Email(identifier.to_lowercase())
        } else {
            Self::Username(identifier.to_string())
        }
    }
}
