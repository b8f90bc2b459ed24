/*
 * Responsibility
 * - 認証で使う users テーブルの読み取り専用 projection
 * - AccountStore trait で差し替え可能にする (テストではインメモリ実装)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AccountRecord {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    pub email: String,
    pub role: String,
    #[sqlx(rename = "isActive")]
    pub is_active: bool,
}

/// Read access to accounts, as needed by request authentication.
///
/// Implementations return `Ok(None)` both for unknown ids and for disabled
/// accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_active_account_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<AccountRecord>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_active_account_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<AccountRecord>, RepoError> {
        let row = sqlx::query_as::<_, AccountRecord>(
            r#"
            SELECT "userId", "email", "role", "isActive"
            FROM users
            WHERE "userId" = $1 AND "isActive" = true
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }
}
