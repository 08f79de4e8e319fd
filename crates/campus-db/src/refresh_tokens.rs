//! Postgres-backed refresh-token ledger.

use sqlx::PgPool;

use campus_auth::{LedgerError, RefreshTokenEntry, RefreshTokenLedger};
use campus_models::TokenFamilyId;

use crate::boxed;

#[derive(Debug, Clone)]
pub struct PgRefreshTokenLedger {
    db: PgPool,
}

impl PgRefreshTokenLedger {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl RefreshTokenLedger for PgRefreshTokenLedger {
    async fn insert(&self, entry: &RefreshTokenEntry) -> Result<(), LedgerError> {
        sqlx::query(
            r#"INSERT INTO refresh_tokens (id, user_id, token_hash, device, expires_at, created_at, revoked_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.token_hash)
        .bind(&entry.device)
        .bind(entry.expires_at)
        .bind(entry.created_at)
        .bind(entry.revoked_at)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return LedgerError::Conflict(entry.id);
            }
            LedgerError::Storage(boxed(e))
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: TokenFamilyId) -> Result<RefreshTokenEntry, LedgerError> {
        sqlx::query_as::<_, RefreshTokenEntry>(
            r#"SELECT id, user_id, token_hash, device, expires_at, created_at, revoked_at
               FROM refresh_tokens
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| LedgerError::Storage(boxed(e)))?
        .ok_or(LedgerError::NotFound)
    }

    async fn revoke(&self, id: TokenFamilyId) -> Result<(), LedgerError> {
        // COALESCE keeps the first revocation time on repeat calls.
        let result = sqlx::query(
            r#"UPDATE refresh_tokens
               SET revoked_at = COALESCE(revoked_at, now())
               WHERE id = $1"#,
        )
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(|e| LedgerError::Storage(boxed(e)))?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::NotFound);
        }

        Ok(())
    }
}
