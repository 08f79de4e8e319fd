//! Postgres-backed user directory.

use sqlx::PgPool;

use campus_auth::{DirectoryError, UserDirectory};
use campus_models::{NewUser, User, UserCredentials, UserLookup};

use crate::boxed;

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

const FIND_BY_ID: &str = r#"SELECT id, username, email, password_hash, created_at, updated_at
    FROM users WHERE id = $1"#;
const FIND_BY_USERNAME: &str = r#"SELECT id, username, email, password_hash, created_at, updated_at
    FROM users WHERE username = $1"#;
const FIND_BY_EMAIL: &str = r#"SELECT id, username, email, password_hash, created_at, updated_at
    FROM users WHERE email = $1"#;

#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl UserDirectory for PgUserDirectory {
    async fn find_by(&self, lookup: UserLookup) -> Result<Option<UserCredentials>, DirectoryError> {
        let query = match &lookup {
            UserLookup::Id(id) => sqlx::query_as::<_, UserCredentials>(FIND_BY_ID).bind(*id),
            UserLookup::Username(username) => {
                sqlx::query_as::<_, UserCredentials>(FIND_BY_USERNAME).bind(username.as_str())
            }
            UserLookup::Email(email) => {
                sqlx::query_as::<_, UserCredentials>(FIND_BY_EMAIL).bind(email.as_str())
            }
        };

        query
            .fetch_optional(&self.db)
            .await
            .map_err(|e| DirectoryError::Storage(boxed(e)))
    }

    async fn create(&self, user: NewUser) -> Result<User, DirectoryError> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (username, email, password_hash)
               VALUES ($1, $2, $3)
               RETURNING id, username, email, created_at, updated_at"#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                match db_err.constraint() {
                    Some(USERNAME_CONSTRAINT) => return DirectoryError::DuplicateUsername,
                    Some(EMAIL_CONSTRAINT) => return DirectoryError::DuplicateEmail,
                    _ => {}
                }
            }
            DirectoryError::Storage(boxed(e))
        })
    }
}
