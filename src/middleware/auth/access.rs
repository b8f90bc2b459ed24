//! access token (HS256 JWT) 検証 → アカウント照会 → Identity を extensions に入れる
//!
//! - 検証ロジック自体は `services::auth::Authenticator` にあり、ここは axum への配線だけ
//! - 失敗は AppError (401 / 500) として返し、ErrorNormalizer がレスポンスを確定する

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// 保護したいルート群に認証を掛ける。
///
/// 例：
/// ```ignore
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = state.authenticator.authenticate(req.headers()).await?;

    tracing::debug!(account_id = %identity.id, role = %identity.role, "request authenticated");

    // middleware → extractor / RoleGate への受け渡し
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
