use std::path::PathBuf;

use anyhow::Context;

mod app;
mod cache;
mod config;
mod db;
mod error;
mod health;
mod state;
mod users;

use crate::config::{AppConfig, AppEnv};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional env file path as the first argument; `.env` otherwise.
    let env_file = std::env::args().nth(1).map(PathBuf::from);
    let app_env = std::env::var("APP_ENV")
        .map(|v| AppEnv::parse(&v))
        .unwrap_or(AppEnv::Development);
    let env_loaded = config::load_env_file(app_env, env_file.as_deref());

    init_tracing();

    if let Err(e) = &env_loaded {
        tracing::warn!(error = %e, "env file not loaded; using process environment");
    }

    let config = AppConfig::from_env().context("load configuration")?;
    tracing::info!(
        app_env = config.app_env.as_str(),
        addr = %config.http_addr,
        "configuration loaded"
    );
    if config.is_production() && config.uses_default_secret() {
        tracing::warn!("SECRET_KEY is not set; using the built-in default");
    }

    let state = state::AppState::init(config).await?;
    db::migrate(&state.db).await;

    let served = app::serve(app::build_app(state.clone()), &state.config.http_addr).await;

    state.shutdown().await;
    served?;
    tracing::info!("server exiting");
    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "users_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}
