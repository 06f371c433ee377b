//! Handlers for scheduled-job control and manual triggers.
//!
//! Manual triggers run a single pass synchronously and report
//! `{ success, message, result }`; per-project failures inside a pass are
//! carried in the result, not surfaced as HTTP errors.

use axum::extract::State;
use axum::Json;

use crate::background::scheduler::SchedulerStatus;
use crate::engine::completion::AutoCompleteSummary;
use crate::engine::reconciliation::FinancialValidationResult;
use crate::response::{DataResponse, TriggerResponse};
use crate::state::AppState;

/// GET /api/v1/jobs/status
pub async fn status(State(state): State<AppState>) -> Json<DataResponse<SchedulerStatus>> {
    Json(DataResponse {
        data: state.scheduler.status(),
    })
}

/// POST /api/v1/jobs/start
pub async fn start(State(state): State<AppState>) -> Json<DataResponse<SchedulerStatus>> {
    std::sync::Arc::clone(&state.scheduler).start();
    Json(DataResponse {
        data: state.scheduler.status(),
    })
}

/// POST /api/v1/jobs/stop
pub async fn stop(State(state): State<AppState>) -> Json<DataResponse<SchedulerStatus>> {
    state.scheduler.stop();
    Json(DataResponse {
        data: state.scheduler.status(),
    })
}

/// POST /api/v1/jobs/auto-completion/run
pub async fn run_auto_completion(
    State(state): State<AppState>,
) -> Json<TriggerResponse<AutoCompleteSummary>> {
    match state.scheduler.run_auto_completion_now().await {
        Ok((message, summary)) => Json(TriggerResponse {
            success: true,
            message,
            result: Some(summary),
        }),
        Err(e) => Json(TriggerResponse {
            success: false,
            message: e.to_string(),
            result: None,
        }),
    }
}

/// POST /api/v1/jobs/reconciliation/run
pub async fn run_reconciliation(
    State(state): State<AppState>,
) -> Json<TriggerResponse<FinancialValidationResult>> {
    match state.scheduler.run_reconciliation_now().await {
        Ok((message, result)) => Json(TriggerResponse {
            success: true,
            message,
            result: Some(result),
        }),
        Err(e) => Json(TriggerResponse {
            success: false,
            message: e.to_string(),
            result: None,
        }),
    }
}
