/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, authenticator: 署名 secret + AccountStore を束ねたもの
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - プロセス起動時に一度だけ組み立て、グローバル変数にはしない
 */
use std::sync::Arc;

use crate::services::auth::Authenticator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, authenticator: Arc<Authenticator>) -> Self {
        Self { db, authenticator }
    }
}
