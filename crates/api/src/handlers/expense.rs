//! Handlers for the `/expenses` resource.
//!
//! Mirrors the income handlers: every mutation ends with a finance
//! recompute on the affected project(s).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use shutterdesk_core::error::CoreError;
use shutterdesk_core::types::DbId;
use shutterdesk_core::validation::validate_amount;
use shutterdesk_db::models::expense::{CreateExpense, Expense, UpdateExpense};
use shutterdesk_db::repositories::income_repo::LedgerFilter;
use shutterdesk_db::repositories::ExpenseRepo;

use crate::engine::finances::recompute_if_linked;
use crate::error::{AppError, AppResult};
use crate::handlers::income::{ensure_project_exists, LedgerListParams};
use crate::state::AppState;

/// POST /api/v1/expenses
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateExpense>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    validate_amount("amount", input.amount)?;
    ensure_project_exists(&state, input.project_id).await?;

    let expense = ExpenseRepo::create(&state.pool, &input).await?;
    recompute_if_linked(&state.pool, expense.project_id).await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /api/v1/expenses
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<LedgerListParams>,
) -> AppResult<Json<Vec<Expense>>> {
    let expenses = ExpenseRepo::list(&state.pool, &LedgerFilter::from(&params)).await?;
    Ok(Json(expenses))
}

/// GET /api/v1/expenses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Expense>> {
    let expense = ExpenseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Expense",
            id,
        }))?;
    Ok(Json(expense))
}

/// PUT /api/v1/expenses/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExpense>,
) -> AppResult<Json<Expense>> {
    if let Some(amount) = input.amount {
        validate_amount("amount", amount)?;
    }
    ensure_project_exists(&state, input.project_id).await?;

    let before = ExpenseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Expense",
            id,
        }))?;

    let expense = ExpenseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Expense",
            id,
        }))?;

    recompute_if_linked(&state.pool, expense.project_id).await?;
    if before.project_id != expense.project_id {
        recompute_if_linked(&state.pool, before.project_id).await?;
    }

    Ok(Json(expense))
}

/// DELETE /api/v1/expenses/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ExpenseRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Expense",
            id,
        }))?;

    recompute_if_linked(&state.pool, deleted.project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
