//! In-memory ledger and user directory for tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use campus_models::{
    NewUser, RefreshTokenEntry, TokenFamilyId, User, UserCredentials, UserId, UserLookup,
};

use crate::directory::{DirectoryError, UserDirectory};
use crate::ledger::{LedgerError, RefreshTokenLedger};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
pub struct MemoryRefreshTokenLedger {
    entries: Mutex<HashMap<TokenFamilyId, RefreshTokenEntry>>,
}

impl MemoryRefreshTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: TokenFamilyId) -> Option<RefreshTokenEntry> {
        lock(&self.entries).get(&id).cloned()
    }
}

impl RefreshTokenLedger for MemoryRefreshTokenLedger {
    async fn insert(&self, entry: &RefreshTokenEntry) -> Result<(), LedgerError> {
        let mut entries = lock(&self.entries);
        if entries.contains_key(&entry.id) {
            return Err(LedgerError::Conflict(entry.id));
        }
        entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TokenFamilyId) -> Result<RefreshTokenEntry, LedgerError> {
        self.get(id).ok_or(LedgerError::NotFound)
    }

    async fn revoke(&self, id: TokenFamilyId) -> Result<(), LedgerError> {
        let mut entries = lock(&self.entries);
        let entry = entries.get_mut(&id).ok_or(LedgerError::NotFound)?;
        entry.revoked_at.get_or_insert_with(Utc::now);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: Mutex<HashMap<UserId, UserCredentials>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.users).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserDirectory for MemoryUserDirectory {
    async fn find_by(&self, lookup: UserLookup) -> Result<Option<UserCredentials>, DirectoryError> {
        let users = lock(&self.users);
        let found = match lookup {
            UserLookup::Id(id) => users.get(&id),
            UserLookup::Username(username) => {
                users.values().find(|c| c.user.username == username)
            }
            UserLookup::Email(email) => users.values().find(|c| c.user.email == email),
        };
        Ok(found.cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DirectoryError> {
        let mut users = lock(&self.users);
        if users.values().any(|c| c.user.username == new_user.username) {
            return Err(DirectoryError::DuplicateUsername);
        }
        if users.values().any(|c| c.user.email == new_user.email) {
            return Err(DirectoryError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: new_user.username,
            email: new_user.email,
            created_at: now,
            updated_at: now,
        };
        users.insert(
            user.id,
            UserCredentials {
                user: user.clone(),
                password_hash: new_user.password_hash,
            },
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn entry(id: TokenFamilyId) -> RefreshTokenEntry {
        let now = Utc::now();
        RefreshTokenEntry {
            id,
            user_id: UserId::new(),
            token_hash: "00".repeat(32),
            device: Some("test".to_string()),
            expires_at: now + TimeDelta::days(1),
            created_at: now,
            revoked_at: None,
        }
    }

    #[tokio::test]
    async fn test_ledger_insert_conflict() {
        let ledger = MemoryRefreshTokenLedger::new();
        let id = TokenFamilyId::new();
        ledger.insert(&entry(id)).await.unwrap();
        let err = ledger.insert(&entry(id)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(conflict) if conflict == id));
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn test_ledger_revoke_keeps_first_timestamp() {
        let ledger = MemoryRefreshTokenLedger::new();
        let id = TokenFamilyId::new();
        ledger.insert(&entry(id)).await.unwrap();

        ledger.revoke(id).await.unwrap();
        let first = ledger.get(id).unwrap().revoked_at;
        assert!(first.is_some());

        ledger.revoke(id).await.unwrap();
        assert_eq!(ledger.get(id).unwrap().revoked_at, first);
    }

    #[tokio::test]
    async fn test_ledger_revoke_unknown() {
        let ledger = MemoryRefreshTokenLedger::new();
        let err = ledger.revoke(TokenFamilyId::new()).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound));
    }

    #[tokio::test]
    async fn test_directory_uniqueness() {
        let directory = MemoryUserDirectory::new();
        let new_user = |username: &str, email: &str| NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        };

        let alice = directory.create(new_user("alice", "a@b.com")).await.unwrap();
        assert!(matches!(
            directory.create(new_user("alice", "other@b.com")).await,
            Err(DirectoryError::DuplicateUsername)
        ));
        assert!(matches!(
            directory.create(new_user("bob", "a@b.com")).await,
            Err(DirectoryError::DuplicateEmail)
        ));

        let by_email = directory
            .find_by(UserLookup::Email("a@b.com".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.user.id, alice.id);
        assert!(
            directory
                .find_by(UserLookup::Username("carol".to_string()))
                .await
                .unwrap()
                .is_none()
        );
    }
}
