//! Signup, login and the token endpoints, composed over a user directory and
//! the token lifecycle service.

use tokio::task;
use tracing::instrument;

use campus_core::{dummy_hash, hash_password, verify_password};
use campus_models::{NewUser, User, UserLookup};

use crate::claims::TokenClaims;
use crate::directory::UserDirectory;
use crate::error::AuthError;
use crate::ledger::RefreshTokenLedger;
use crate::tokens::{TokenPair, TokenService};

#[derive(Debug, Clone)]
pub struct AuthService<U, L> {
    directory: U,
    tokens: TokenService<L>,
}

impl<U, L> AuthService<U, L>
where
    U: UserDirectory,
    L: RefreshTokenLedger,
{
    pub fn new(directory: U, tokens: TokenService<L>) -> Self {
        Self { directory, tokens }
    }

    pub fn tokens(&self) -> &TokenService<L> {
        &self.tokens
    }

    pub fn directory(&self) -> &U {
        &self.directory
    }

    /// Creates an account and logs it in.
    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        email: &str,
        username: &str,
        password: &str,
        device: Option<String>,
    ) -> Result<(User, TokenPair), AuthError> {
        let password = password.to_owned();
        let password_hash = task::spawn_blocking(move || hash_password(&password)).await??;

        let user = self
            .directory
            .create(NewUser {
                username: username.to_string(),
                email: email.trim().to_lowercase(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User signed up");

        let pair = self
            .tokens
            .issue_pair(user.id, &user.username, &user.email, device)
            .await?;

        Ok((user, pair))
    }

    /// Checks a username-or-email and password pair and starts a new session.
    ///
    /// An unknown identifier still pays for one bcrypt verify so both failure
    /// paths take the same time.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        device: Option<String>,
    ) -> Result<(User, TokenPair), AuthError> {
        let credentials = self
            .directory
            .find_by(UserLookup::from_login(identifier))
            .await?;

        let (user, hash) = match credentials {
            Some(credentials) => (Some(credentials.user), Some(credentials.password_hash)),
            None => (None, None),
        };

        let password = password.to_owned();
        let matches = task::spawn_blocking(move || {
            let hash = match &hash {
                Some(hash) => hash.as_str(),
                None => dummy_hash()?,
            };
            verify_password(&password, hash)
        })
        .await??;

        let Some(user) = user else {
            tracing::debug!("Login for unknown user");
            return Err(AuthError::UserNotFound);
        };
        if !matches {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self
            .tokens
            .issue_pair(user.id, &user.username, &user.email, device)
            .await?;

        Ok((user, pair))
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.tokens.refresh(refresh_token).await
    }

    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.tokens.revoke_session(token).await.map(|_| ())
    }

    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.tokens.revoke(refresh_token).await.map(|_| ())
    }

    pub async fn verify(&self, access_token: &str) -> Result<TokenClaims, AuthError> {
        self.tokens.validate(access_token).await
    }

    /// Loads the account behind already validated claims.
    pub async fn current_user(&self, claims: &TokenClaims) -> Result<User, AuthError> {
        self.directory
            .find_by(UserLookup::Id(claims.user_id()?))
            .await?
            .map(|credentials| credentials.user)
            .ok_or(AuthError::UserNotFound)
    }
}
