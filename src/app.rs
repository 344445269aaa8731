/*
 * Responsibility
 * - Load Config -> build dependencies -> assemble the Router
 * - Apply HTTP middleware (request id, tracing, limits)
 * - Start with axum::serve()
 */
use axum::Router;
use std::{panic, process, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::headers::HeaderFlattener;
use crate::middleware;
use crate::services::auth::build_token_verifier;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,claims_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing; stderr may be hidden depending on the launcher.
        tracing::error!(?info, "panic");

        // Development fails fast; production keeps the default hook and the server.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting claims gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );
    tracing::info!(
        header_prefix = %config.header_prefix,
        readonly_host_marker = %config.readonly_host_marker,
        admin_count = config.admin_list.len(),
        "authorization policy loaded"
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, addr = %config.addr, "failed to bind");
            AppError::Internal
        })?;
    axum::serve(listener, app).await.map_err(|err| {
        tracing::error!(error = %err, "server error");
        AppError::Internal
    })?;

    Ok(())
}

/// Build process-level services and inject them into the shared application state.
pub fn build_state(config: &Config) -> Result<AppState, AppError> {
    let verifier = build_token_verifier(config)?;
    let flattener = HeaderFlattener::new(Arc::new(config.authorization_policy()));

    Ok(AppState::new(verifier, flattener, config.header_prefix.as_str()))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes().with_state(state);
    middleware::http::apply(router, config.http_limits)
}
