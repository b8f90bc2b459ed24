/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (PgPool, AccountStore, Authenticator) → Router 組み立て
 * - Middleware の適用順: routes → ErrorNormalizer → HTTP 横断 layer
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api::{self, v1::handlers::fallback},
    config::{AppEnv, Config},
    middleware::{self, http::HttpLimits},
    repos::account_repo::PgAccountStore,
    services::auth::build_authenticator,
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,clinic_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get lost.
        tracing::error!(?info, "panic");

        // In development, fail fast. In production, let the server keep running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(
        state,
        config.app_env,
        HttpLimits {
            body_limit_bytes: config.body_limit_bytes,
            request_timeout: config.request_timeout,
        },
    );

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    // Process-level dependencies are built once here and injected via AppState.
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.account_lookup_timeout)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let accounts = Arc::new(PgAccountStore::new(db.clone()));
    let authenticator = build_authenticator(config, accounts);

    Ok(AppState::new(db, authenticator))
}

/// Full application router. The ErrorNormalizer is the last application layer
/// so every failure raised below it is logged and rendered there.
pub fn build_router(state: AppState, app_env: AppEnv, limits: HttpLimits) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        // after nest, so the nested method routers pick up the 405 handler too
        .method_not_allowed_fallback(fallback::method_not_allowed)
        .fallback(fallback::route_not_found)
        .with_state(state);

    let router = middleware::errors::apply(router, app_env);
    middleware::http::apply(router, limits)
}
