//! Repository for the `projects` table.

use sqlx::PgPool;

use shutterdesk_core::finance::FinancialSnapshot;
use shutterdesk_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::status::{IncomeStatus, ProjectStatus, StatusId};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, name, company, project_type, status_id, \
     shoot_start_date, shoot_end_date, amount, outsourcing_amt, \
     received_amt, pending_amt, profit, created_at, updated_at";

/// Outcome of [`ProjectRepo::complete_and_convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionWrite {
    /// Whether the status row was actually moved to Completed.
    pub status_changed: bool,
    /// Whether a pending income row was converted to Received.
    pub income_converted: bool,
}

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// When `amount > 0`, an initial Pending income entry for the full
    /// contracted amount is inserted in the same transaction; `pending_amt`
    /// starts at `amount` and `profit` at `amount - outsourcing_amt`.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects \
                (code, name, company, project_type, status_id, \
                 shoot_start_date, shoot_end_date, amount, outsourcing_amt, \
                 pending_amt, profit) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $8, $8 - $9) \
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.company)
            .bind(&input.project_type)
            .bind(input.status_id)
            .bind(input.shoot_start_date)
            .bind(input.shoot_end_date)
            .bind(input.amount)
            .bind(input.outsourcing_amt)
            .fetch_one(&mut *tx)
            .await?;

        if input.amount > 0 {
            sqlx::query(
                "INSERT INTO incomes (amount, description, project_id, status_id) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(input.amount)
            .bind("Project payment")
            .bind(project.id)
            .bind(IncomeStatus::Pending.id())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by its unique code.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE code = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// List every project not yet Completed (including NULL status), oldest
    /// first so batch passes process long-lived projects before new ones.
    pub async fn list_not_completed(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects \
             WHERE status_id IS NULL OR status_id <> $1 \
             ORDER BY id"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(ProjectStatus::Completed.id())
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                company = COALESCE($4, company),
                project_type = COALESCE($5, project_type),
                status_id = COALESCE($6, status_id),
                shoot_start_date = COALESCE($7, shoot_start_date),
                shoot_end_date = COALESCE($8, shoot_end_date),
                amount = COALESCE($9, amount),
                outsourcing_amt = COALESCE($10, outsourcing_amt)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.company)
            .bind(&input.project_type)
            .bind(input.status_id)
            .bind(input.shoot_start_date)
            .bind(input.shoot_end_date)
            .bind(input.amount)
            .bind(input.outsourcing_amt)
            .fetch_optional(pool)
            .await
    }

    /// Write only the status column. Returns `false` if the project is gone.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status_id: StatusId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(status_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Write the derived financial fields. Returns `false` if the project
    /// is gone.
    pub async fn update_finances(
        pool: &PgPool,
        id: DbId,
        snapshot: &FinancialSnapshot,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects \
             SET received_amt = $2, pending_amt = $3, profit = $4 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(snapshot.received_amt)
        .bind(snapshot.pending_amt)
        .bind(snapshot.profit)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a project to Completed and convert its oldest Pending income row
    /// to Received in a single transaction.
    ///
    /// The status write only fires when the project is not already
    /// Completed, so repeated calls are no-ops. A project with no pending
    /// income converts nothing; that is not an error.
    pub async fn complete_and_convert(
        pool: &PgPool,
        id: DbId,
    ) -> Result<CompletionWrite, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let status_changed = sqlx::query(
            "UPDATE projects SET status_id = $2 \
             WHERE id = $1 AND (status_id IS NULL OR status_id <> $2)",
        )
        .bind(id)
        .bind(ProjectStatus::Completed.id())
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        let income_converted = sqlx::query(
            "UPDATE incomes SET status_id = $3, entry_date = NOW() \
             WHERE id = (SELECT id FROM incomes \
                         WHERE project_id = $1 AND status_id = $2 \
                         ORDER BY entry_date, id LIMIT 1)",
        )
        .bind(id)
        .bind(IncomeStatus::Pending.id())
        .bind(IncomeStatus::Received.id())
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        tx.commit().await?;
        Ok(CompletionWrite {
            status_changed,
            income_converted,
        })
    }

    /// Count ledger rows (income + expense) referencing the project.
    pub async fn ledger_row_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT (SELECT COUNT(*) FROM incomes WHERE project_id = $1) \
                  + (SELECT COUNT(*) FROM expenses WHERE project_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Delete a project with no ledger rows. Returns `true` if a row was
    /// removed. Callers must check [`Self::ledger_row_count`] first; a
    /// referenced project fails on the FK constraint.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Force-delete a project and every ledger row referencing it in one
    /// transaction. Returns `true` if the project row was removed.
    pub async fn force_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM incomes WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM expenses WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
