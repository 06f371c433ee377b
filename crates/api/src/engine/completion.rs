//! Completion evaluation, the date-driven status machine, and the batch
//! auto-completion pass.
//!
//! The date machine may move a project to NotStarted or InProgress on its
//! own, but the Completed transition always goes through the completion
//! evaluator: a shoot whose end date has passed does not complete until the
//! payment criteria agree. OnHold projects are never touched.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;

use shutterdesk_core::completion::{evaluate, CompletionDecision};
use shutterdesk_core::error::CoreError;
use shutterdesk_core::lifecycle::{is_auto_transition_allowed, status_for_dates, STATUS_COMPLETED};
use shutterdesk_core::types::DbId;
use shutterdesk_db::models::project::Project;
use shutterdesk_db::models::status::ProjectStatus;
use shutterdesk_db::repositories::{IncomeRepo, ProjectRepo};

use crate::engine::finances::recompute_project_finances;
use crate::error::{AppError, AppResult};

/// Outcome of [`mark_project_complete`].
#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub project_id: DbId,
    /// `false` when the project was already Completed (idempotent no-op).
    pub status_changed: bool,
    /// Whether a pending income row was converted to Received.
    pub income_converted: bool,
    pub reason: String,
}

/// Per-project entry in the auto-completion batch result.
#[derive(Debug, Clone, Serialize)]
pub struct AutoCompleteDetail {
    pub project_id: DbId,
    pub code: String,
    pub success: bool,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one auto-completion pass over all non-completed projects.
#[derive(Debug, Clone, Serialize)]
pub struct AutoCompleteSummary {
    pub checked: usize,
    pub completed: usize,
    pub errors: usize,
    pub details: Vec<AutoCompleteDetail>,
}

/// Evaluate the completion criteria for one project.
///
/// `received_amt` is re-summed from the income rows rather than read from
/// the cached project field, so a stale cache can never satisfy a criterion.
pub async fn check_completion_criteria(
    pool: &PgPool,
    project_id: DbId,
) -> AppResult<CompletionDecision> {
    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let received = IncomeRepo::sum_received_for_project(pool, project_id).await?;

    Ok(evaluate(
        project.status_id,
        project.amount,
        received,
        project.shoot_end_date,
        Utc::now().date_naive(),
    ))
}

/// Complete a project: status write + income conversion in one transaction,
/// then a finance recompute over the post-conversion ledger.
///
/// Already-Completed projects are an idempotent no-op. Unless
/// `admin_override` is set, the completion evaluator must agree.
pub async fn mark_project_complete(
    pool: &PgPool,
    project_id: DbId,
    reason: Option<String>,
    admin_override: bool,
) -> AppResult<CompletionOutcome> {
    let decision = check_completion_criteria(pool, project_id).await?;

    if decision.status_id == Some(ProjectStatus::Completed.id()) {
        return Ok(CompletionOutcome {
            project_id,
            status_changed: false,
            income_converted: false,
            reason: "Already completed".to_string(),
        });
    }

    if !decision.should_complete && !admin_override {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Completion criteria not met: received {} of {}",
            decision.received_amt, decision.amount
        ))));
    }

    let reason = reason
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| {
            if decision.should_complete {
                decision.reason.clone()
            } else {
                "Admin override".to_string()
            }
        });

    let write = ProjectRepo::complete_and_convert(pool, project_id).await?;
    recompute_project_finances(pool, project_id).await?;

    tracing::info!(
        project_id,
        %reason,
        admin_override,
        income_converted = write.income_converted,
        "Project marked complete"
    );

    Ok(CompletionOutcome {
        project_id,
        status_changed: write.status_changed,
        income_converted: write.income_converted,
        reason,
    })
}

/// Convert a Completed project's pending income entry to Received.
///
/// Projects in any other status are a no-op; so is a completed project with
/// no pending entry left (e.g. a zero-amount project). Returns whether a
/// row was converted.
pub async fn convert_pending_income(pool: &PgPool, project_id: DbId) -> AppResult<bool> {
    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    if project.status_id != Some(ProjectStatus::Completed.id()) {
        return Ok(false);
    }

    let converted = IncomeRepo::convert_pending(pool, project_id).await?;
    if converted {
        recompute_project_finances(pool, project_id).await?;
        tracing::info!(project_id, "Converted pending income to received");
    }
    Ok(converted)
}

/// Apply the date-driven state machine to one project.
///
/// Returns the status that was written, or `None` when nothing changed.
/// OnHold and Completed projects are skipped. A computed Completed status is
/// not applied here; completion always goes through the evaluator in
/// [`auto_complete_projects`] or [`mark_project_complete`].
pub async fn advance_project_status(
    pool: &PgPool,
    project: &Project,
) -> AppResult<Option<i16>> {
    if !is_auto_transition_allowed(project.status_id) {
        return Ok(None);
    }

    let today = Utc::now().date_naive();
    let computed = status_for_dates(project.shoot_start_date, project.shoot_end_date, today);

    match computed {
        Some(status) if status != STATUS_COMPLETED && Some(status) != project.status_id => {
            ProjectRepo::update_status(pool, project.id, status).await?;
            tracing::info!(
                project_id = project.id,
                code = %project.code,
                status,
                "Advanced project status from shoot dates"
            );
            Ok(Some(status))
        }
        _ => Ok(None),
    }
}

/// One auto-completion pass over every non-Completed project.
///
/// Projects are processed one at a time; a failure on one project is logged
/// and counted, and the loop moves on.
pub async fn auto_complete_projects(pool: &PgPool) -> AppResult<AutoCompleteSummary> {
    let projects = ProjectRepo::list_not_completed(pool).await?;

    let mut summary = AutoCompleteSummary {
        checked: projects.len(),
        completed: 0,
        errors: 0,
        details: Vec::with_capacity(projects.len()),
    };

    for project in &projects {
        match process_one(pool, project).await {
            Ok(detail) => {
                if detail.completed {
                    summary.completed += 1;
                }
                summary.details.push(detail);
            }
            Err(e) => {
                tracing::warn!(
                    project_id = project.id,
                    code = %project.code,
                    error = %e,
                    "Auto-completion failed for project"
                );
                summary.errors += 1;
                summary.details.push(AutoCompleteDetail {
                    project_id: project.id,
                    code: project.code.clone(),
                    success: false,
                    completed: false,
                    reason: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    tracing::info!(
        checked = summary.checked,
        completed = summary.completed,
        errors = summary.errors,
        "Auto-completion pass finished"
    );
    Ok(summary)
}

/// Date transition + completion evaluation for a single project.
async fn process_one(pool: &PgPool, project: &Project) -> AppResult<AutoCompleteDetail> {
    if !is_auto_transition_allowed(project.status_id) {
        return Ok(AutoCompleteDetail {
            project_id: project.id,
            code: project.code.clone(),
            success: true,
            completed: false,
            reason: Some("On hold".to_string()),
            error: None,
        });
    }

    advance_project_status(pool, project).await?;

    let decision = check_completion_criteria(pool, project.id).await?;
    if !decision.should_complete {
        return Ok(AutoCompleteDetail {
            project_id: project.id,
            code: project.code.clone(),
            success: true,
            completed: false,
            reason: None,
            error: None,
        });
    }

    let outcome = mark_project_complete(pool, project.id, None, false).await?;
    Ok(AutoCompleteDetail {
        project_id: project.id,
        code: project.code.clone(),
        success: true,
        completed: outcome.status_changed,
        reason: Some(outcome.reason),
        error: None,
    })
}
