//! Handlers for the `/incomes` resource.
//!
//! Every mutation ends with a finance recompute on the affected project;
//! when an update moves an entry between projects, both sides are
//! recomputed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use shutterdesk_core::error::CoreError;
use shutterdesk_core::types::DbId;
use shutterdesk_core::validation::validate_amount;
use shutterdesk_db::models::income::{CreateIncome, Income, UpdateIncome};
use shutterdesk_db::repositories::income_repo::LedgerFilter;
use shutterdesk_db::repositories::{IncomeRepo, ProjectRepo};

use crate::engine::finances::recompute_if_linked;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for ledger listings.
#[derive(Debug, Deserialize)]
pub struct LedgerListParams {
    pub project_id: Option<DbId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl From<&LedgerListParams> for LedgerFilter {
    fn from(params: &LedgerListParams) -> Self {
        LedgerFilter {
            project_id: params.project_id,
            from: params.from,
            to: params.to,
        }
    }
}

/// Reject ledger entries referencing a project that does not exist.
pub(crate) async fn ensure_project_exists(
    state: &AppState,
    project_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(id) = project_id {
        if ProjectRepo::find_by_id(&state.pool, id).await?.is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Referenced project {id} does not exist"
            ))));
        }
    }
    Ok(())
}

/// POST /api/v1/incomes
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateIncome>,
) -> AppResult<(StatusCode, Json<Income>)> {
    validate_amount("amount", input.amount)?;
    ensure_project_exists(&state, input.project_id).await?;

    let income = IncomeRepo::create(&state.pool, &input).await?;
    recompute_if_linked(&state.pool, income.project_id).await?;

    Ok((StatusCode::CREATED, Json(income)))
}

/// GET /api/v1/incomes
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<LedgerListParams>,
) -> AppResult<Json<Vec<Income>>> {
    let incomes = IncomeRepo::list(&state.pool, &LedgerFilter::from(&params)).await?;
    Ok(Json(incomes))
}

/// GET /api/v1/incomes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Income>> {
    let income = IncomeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Income",
            id,
        }))?;
    Ok(Json(income))
}

/// PUT /api/v1/incomes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIncome>,
) -> AppResult<Json<Income>> {
    if let Some(amount) = input.amount {
        validate_amount("amount", amount)?;
    }
    ensure_project_exists(&state, input.project_id).await?;

    let before = IncomeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Income",
            id,
        }))?;

    let income = IncomeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Income",
            id,
        }))?;

    // Recompute the new project, and the old one when the entry moved.
    recompute_if_linked(&state.pool, income.project_id).await?;
    if before.project_id != income.project_id {
        recompute_if_linked(&state.pool, before.project_id).await?;
    }

    Ok(Json(income))
}

/// DELETE /api/v1/incomes/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = IncomeRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Income",
            id,
        }))?;

    recompute_if_linked(&state.pool, deleted.project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
