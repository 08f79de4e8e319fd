//! The user-storage contract consumed by signup and login.

use std::future::Future;

use campus_models::{NewUser, User, UserCredentials, UserLookup};

use crate::BoxError;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("User storage failure: {0}")]
    Storage(#[source] BoxError),
}

pub trait UserDirectory: Send + Sync {
    fn find_by(
        &self,
        lookup: UserLookup,
    ) -> impl Future<Output = Result<Option<UserCredentials>, DirectoryError>> + Send;

    /// Creates a user. Username and email are each unique.
    fn create(&self, user: NewUser) -> impl Future<Output = Result<User, DirectoryError>> + Send;
}
