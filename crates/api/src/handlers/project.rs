//! Handlers for the `/projects` resource.
//!
//! Create seeds the initial pending income entry; update re-derives the
//! financial fields when the contracted amounts change and runs the
//! completion path when the status is edited to Completed; delete refuses
//! to orphan ledger rows unless `?force=true`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use shutterdesk_core::error::CoreError;
use shutterdesk_core::types::DbId;
use shutterdesk_core::validation::{validate_amount, validate_project_code, validate_shoot_dates};
use shutterdesk_db::models::project::{CreateProject, Project, UpdateProject};
use shutterdesk_db::models::status::ProjectStatus;
use shutterdesk_db::repositories::ProjectRepo;

use crate::engine::completion::{
    check_completion_criteria, convert_pending_income, mark_project_complete, CompletionOutcome,
};
use crate::engine::finances::recompute_project_finances;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for DELETE /projects/{id}.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub force: bool,
}

/// Request body for POST /projects/{id}/complete.
#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub reason: Option<String>,
    #[serde(default)]
    pub admin_override: bool,
}

fn validate_create_input(input: &CreateProject) -> AppResult<()> {
    validate_project_code(&input.code)?;
    validate_amount("amount", input.amount)?;
    validate_amount("outsourcing_amt", input.outsourcing_amt)?;
    validate_shoot_dates(input.shoot_start_date, input.shoot_end_date)?;
    Ok(())
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    validate_create_input(&input)?;

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, code = %project.code, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    if let Some(ref code) = input.code {
        validate_project_code(code)?;
    }
    if let Some(amount) = input.amount {
        validate_amount("amount", amount)?;
    }
    if let Some(outsourcing) = input.outsourcing_amt {
        validate_amount("outsourcing_amt", outsourcing)?;
    }

    let before = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let start = input.shoot_start_date.or(before.shoot_start_date);
    let end = input.shoot_end_date.or(before.shoot_end_date);
    validate_shoot_dates(start, end)?;

    let mut project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    // Contracted amounts feed the derived fields; re-derive on change.
    let finances_stale = project.amount != before.amount
        || project.outsourcing_amt != before.outsourcing_amt;

    // A manual edit to Completed goes through the conversion path so the
    // pending income entry does not linger.
    let completed_now = project.status_id == Some(ProjectStatus::Completed.id())
        && before.status_id != Some(ProjectStatus::Completed.id());

    if completed_now {
        convert_pending_income(&state.pool, id).await?;
        tracing::info!(project_id = id, code = %project.code, "Project manually completed");
    }

    if completed_now || finances_stale {
        recompute_project_finances(&state.pool, id).await?;
        project = ProjectRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id,
            }))?;
    }

    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Refused with 409 while ledger rows reference the project, unless
/// `?force=true` cascades over them.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DeleteParams>,
) -> AppResult<StatusCode> {
    let ledger_rows = ProjectRepo::ledger_row_count(&state.pool, id).await?;

    let deleted = if params.force {
        ProjectRepo::force_delete(&state.pool, id).await?
    } else if ledger_rows > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Project has {ledger_rows} ledger entries; delete with force=true to cascade"
        ))));
    } else {
        ProjectRepo::delete(&state.pool, id).await?
    };

    if deleted {
        tracing::info!(project_id = id, force = params.force, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

/// GET /api/v1/projects/{id}/completion-check
pub async fn completion_check(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<shutterdesk_core::completion::CompletionDecision>>> {
    let decision = check_completion_criteria(&state.pool, id).await?;
    Ok(Json(DataResponse { data: decision }))
}

/// POST /api/v1/projects/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<CompleteRequest>,
) -> AppResult<Json<DataResponse<CompletionOutcome>>> {
    let outcome =
        mark_project_complete(&state.pool, id, body.reason, body.admin_override).await?;
    Ok(Json(DataResponse { data: outcome }))
}
