//! Route definitions for the `/reconciliation` endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reconciliation;
use crate::state::AppState;

/// Routes mounted at `/reconciliation`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate", get(reconciliation::validate))
        .route("/report", get(reconciliation::report))
        .route("/corrections", post(reconciliation::corrections))
        .route("/stats", get(reconciliation::stats))
}
