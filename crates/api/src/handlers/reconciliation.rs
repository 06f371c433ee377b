//! Handlers for the `/reconciliation` endpoints.
//!
//! Thin pass-throughs over the engine's validate/reconcile/correct/stats
//! entry points.

use axum::extract::State;
use axum::Json;

use crate::engine::reconciliation::{
    perform_automated_corrections, reconcile_project_finances, reconciliation_stats,
    validate_financial_consistency, CorrectionResult, FinancialValidationResult,
    ReconciliationStats, ValidationResult,
};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/reconciliation/validate
pub async fn validate(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ValidationResult>>> {
    let result = validate_financial_consistency(&state.pool).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/reconciliation/report
pub async fn report(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<FinancialValidationResult>>> {
    let result = reconcile_project_finances(&state.pool).await?;
    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/reconciliation/corrections
pub async fn corrections(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CorrectionResult>>> {
    let result = perform_automated_corrections(&state.pool).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/reconciliation/stats
pub async fn stats(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ReconciliationStats>>> {
    let result = reconciliation_stats(&state.pool).await?;
    Ok(Json(DataResponse { data: result }))
}
