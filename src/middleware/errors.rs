//! ErrorNormalizer: the terminal failure stage.
//!
//! Every `AppError` turned into a response (by a handler, an extractor or
//! another middleware) leaves an `ErrorReport` in the response extensions.
//! This layer logs the raw error and, outside production, re-renders the body
//! with a `stack` field. It must be the last application layer registered so
//! it wraps everything that can fail.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::config::AppEnv;
use crate::error::ErrorReport;

pub fn apply(router: Router, app_env: AppEnv) -> Router {
    router.layer(middleware::from_fn_with_state(app_env, normalize_errors))
}

async fn normalize_errors(
    State(app_env): State<AppEnv>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let mut response = next.run(req).await;

    let Some(ErrorReport(err)) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    let normalized = err.normalize();
    tracing::error!(
        error = ?err,
        status = normalized.status.as_u16(),
        operational = normalized.is_operational,
        %method,
        %uri,
        "request failed"
    );

    if app_env.is_production() {
        return response;
    }

    err.render(false, true)
}
