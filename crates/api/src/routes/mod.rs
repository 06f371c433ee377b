pub mod expense;
pub mod health;
pub mod income;
pub mod jobs;
pub mod project;
pub mod reconciliation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                             list, create
/// /projects/{id}                        get, update, delete (?force=true)
/// /projects/{id}/completion-check       evaluate completion criteria (GET)
/// /projects/{id}/complete               mark complete (POST)
///
/// /incomes                              list, create
/// /incomes/{id}                         get, update, delete
///
/// /expenses                             list, create
/// /expenses/{id}                        get, update, delete
///
/// /reconciliation/validate              consistency check (GET)
/// /reconciliation/report                full scan with totals (GET)
/// /reconciliation/corrections           apply corrections (POST)
/// /reconciliation/stats                 summary counts (GET)
///
/// /jobs/status                          scheduler status (GET)
/// /jobs/start                           start scheduler (POST)
/// /jobs/stop                            stop scheduler (POST)
/// /jobs/auto-completion/run             manual pass (POST)
/// /jobs/reconciliation/run              manual pass (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/incomes", income::router())
        .nest("/expenses", expense::router())
        .nest("/reconciliation", reconciliation::router())
        .nest("/jobs", jobs::router())
}
