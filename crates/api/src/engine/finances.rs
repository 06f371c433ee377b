//! Ledger aggregation: derive a project's financial fields from its ledger.

use sqlx::PgPool;

use shutterdesk_core::error::CoreError;
use shutterdesk_core::finance::{derive_finances, FinancialSnapshot};
use shutterdesk_core::types::DbId;
use shutterdesk_db::models::project::Project;
use shutterdesk_db::repositories::{ExpenseRepo, IncomeRepo, ProjectRepo};

use crate::error::{AppError, AppResult};

/// Recompute the expected financial snapshot for an already-loaded project.
///
/// Shared by [`recompute_project_finances`] and the reconciliation validator
/// so both always agree on what the stored fields should be.
pub async fn expected_finances(pool: &PgPool, project: &Project) -> AppResult<FinancialSnapshot> {
    let total_income = IncomeRepo::sum_received_for_project(pool, project.id).await?;
    let total_expenses = ExpenseRepo::sum_for_project(pool, project.id).await?;

    Ok(derive_finances(
        project.amount,
        project.outsourcing_amt,
        total_income,
        total_expenses,
    ))
}

/// Recompute and persist a project's derived financial fields.
///
/// Invoked after every income/expense create, update, or delete that touches
/// the project, and by the reconciliation corrector. Idempotent: with no
/// ledger change, a second call writes the same values.
pub async fn recompute_project_finances(pool: &PgPool, project_id: DbId) -> AppResult<()> {
    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let snapshot = expected_finances(pool, &project).await?;
    ProjectRepo::update_finances(pool, project_id, &snapshot).await?;

    tracing::debug!(
        project_id,
        received_amt = snapshot.received_amt,
        pending_amt = snapshot.pending_amt,
        profit = snapshot.profit,
        "Recomputed project finances"
    );
    Ok(())
}

/// Recompute finances for an optional project reference, ignoring rows that
/// are not linked to any project.
///
/// Ledger CRUD handlers use this so an unlinked income/expense entry does
/// not error.
pub async fn recompute_if_linked(pool: &PgPool, project_id: Option<DbId>) -> AppResult<()> {
    if let Some(id) = project_id {
        recompute_project_finances(pool, id).await?;
    }
    Ok(())
}
