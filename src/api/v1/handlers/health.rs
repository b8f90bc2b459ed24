/*
 * Responsibility
 * - GET /health (疎通用)
 * - 認証なし (Authenticator の外側にマウントする)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"success": true, "status": "ok"})))
}
