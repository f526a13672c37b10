/*
 * Responsibility
 * - Config読み込み → 依存生成 (directory / verifier / codec / dispatcher) → Router 組み立て
 * - Middleware の適用 (Bearer 認証 / HTTP 共通)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Context;
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, handlers::health::health};
use crate::config::Config;
use crate::middleware;
use crate::repos::{InMemoryPrincipalRepo, PgPrincipalRepo, PrincipalDirectory};
use crate::services::auth::factory::{FactoryError, build_dispatcher, build_token_codec};
use crate::services::password::{Argon2Verifier, CredentialVerifier};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,r2s_auth=debug,tower_http=debug cargo run
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
        tracing::error!(?info, "panic");

        // development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting auth API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Process-level services. Postgres when `DATABASE_URL` is set, in-memory otherwise.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let directory: Arc<dyn PrincipalDirectory> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            sqlx::migrate!()
                .run(&pool)
                .await
                .context("failed to run migrations")?;
            Arc::new(PgPrincipalRepo::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; principals are kept in memory");
            Arc::new(InMemoryPrincipalRepo::new())
        }
    };

    let verifier: Arc<dyn CredentialVerifier> = Arc::new(Argon2Verifier::new(config.argon2)?);

    Ok(assemble_state(config, directory, verifier)?)
}

pub fn assemble_state(
    config: &Config,
    directory: Arc<dyn PrincipalDirectory>,
    verifier: Arc<dyn CredentialVerifier>,
) -> Result<AppState, FactoryError> {
    let codec = build_token_codec(config);
    let auth = build_dispatcher(
        config,
        Arc::clone(&codec),
        Arc::clone(&directory),
        Arc::clone(&verifier),
    )?;

    Ok(AppState::new(
        auth,
        codec,
        directory,
        verifier,
        config.default_auth_type.as_str(),
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api::routes());

    // 全リクエストが 1 回だけ interceptor を通る
    let router = middleware::auth::access::apply(router, state.clone()).with_state(state);

    middleware::http::apply(router, config)
}
