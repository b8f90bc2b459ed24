/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - public (/health) と protected (Authenticator 配下) を分けて merge する
 * - RoleGate は route group ごとに route_layer で掛け、その外側に Authenticator を掛ける
 */
use axum::{
    Router,
    routing::{delete, get},
};

use crate::middleware::auth::{
    self as auth_mw, RoleGate,
    roles::{ROLE_ADMIN, ROLE_STAFF},
};
use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    me::me,
    patients::{create_patient, delete_patient, get_patient, list_patients, update_patient},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let account = Router::new().route("/me", get(me));

    let clinical = auth_mw::roles::apply(
        Router::new()
            .route("/patients", get(list_patients).post(create_patient))
            .route(
                "/patients/{patient_id}",
                get(get_patient).put(update_patient),
            ),
        RoleGate::new([ROLE_ADMIN, ROLE_STAFF]),
    );

    let admin = auth_mw::roles::apply(
        Router::new().route("/admin/patients/{patient_id}", delete(delete_patient)),
        RoleGate::new([ROLE_ADMIN]),
    );

    let protected = auth_mw::access::apply(account.merge(clinical).merge(admin), state);

    Router::new().route("/health", get(health)).merge(protected)
}
