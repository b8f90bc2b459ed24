use axum::Json;

use crate::api::v1::extractors::{CurrentIdentity, Identity};

/// GET /me: the identity the Authenticator resolved for this request.
pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<Identity> {
    Json(identity)
}
