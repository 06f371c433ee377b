//! Route definitions for scheduled-job control.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(jobs::status))
        .route("/start", post(jobs::start))
        .route("/stop", post(jobs::stop))
        .route("/auto-completion/run", post(jobs::run_auto_completion))
        .route("/reconciliation/run", post(jobs::run_reconciliation))
}
