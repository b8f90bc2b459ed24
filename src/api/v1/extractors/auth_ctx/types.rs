/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - Authenticator が検証して request extensions に格納し、handler / RoleGate はこの型だけを受け取る
 *
 * Notes
 * - トークン検証やアカウント照会は services::auth::authenticator の責務
 * - 1 リクエストの間だけ存在し、リクエスト間で共有しない
 */

use serde::Serialize;
use uuid::Uuid;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `role` はトークンではなくアカウントストアから毎回取得した値
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}
