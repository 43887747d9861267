use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::{db, state::AppState};

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
}

/// GET /ping
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse { message: "pong" })
}

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub database: &'static str,
    pub cache: &'static str,
}

fn label(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "unavailable"
    }
}

/// GET /health/ready — 503 unless both the database and the cache answer.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let (database, cache) = tokio::join!(
        tokio::time::timeout(db::PING_TIMEOUT, db::ping(&state.db)),
        tokio::time::timeout(db::PING_TIMEOUT, state.cache.ping()),
    );
    let database_ok = matches!(database, Ok(Ok(())));
    let cache_ok = matches!(cache, Ok(Ok(())));

    if !(database_ok && cache_ok) {
        warn!(database_ok, cache_ok, "readiness check failed");
    }

    let status = if database_ok && cache_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(Readiness {
            status: label(database_ok && cache_ok),
            database: label(database_ok),
            cache: label(cache_ok),
        }),
    )
}
