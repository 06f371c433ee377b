//! Root-level `/health` probe.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthReport {
    /// `ok` when the database answers, `degraded` otherwise.
    status: &'static str,
    version: &'static str,
    db_healthy: bool,
}

/// GET /health
///
/// Always answers 200; a broken database flips the body to `degraded`
/// rather than failing the probe, so load balancers can tell "process up,
/// store down" apart from "process down".
async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let db_healthy = shutterdesk_db::health_check(&state.pool).await.is_ok();

    Json(HealthReport {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mounted at the router root, not under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
