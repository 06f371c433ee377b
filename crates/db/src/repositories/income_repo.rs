//! Repository for the `incomes` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shutterdesk_core::types::{DbId, Money};

use crate::models::income::{CreateIncome, Income, UpdateIncome};
use crate::models::status::IncomeStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, amount, description, entry_date, project_id, status_id, created_at, updated_at";

/// Optional filters for income listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerFilter {
    pub project_id: Option<DbId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Provides CRUD and aggregate operations for income entries.
pub struct IncomeRepo;

impl IncomeRepo {
    /// Insert a new income entry, returning the created row.
    ///
    /// Manual entries default to Received; only the project-creation path
    /// inserts Pending rows.
    pub async fn create(pool: &PgPool, input: &CreateIncome) -> Result<Income, sqlx::Error> {
        let query = format!(
            "INSERT INTO incomes (amount, description, entry_date, project_id, status_id) \
             VALUES ($1, $2, COALESCE($3, NOW()), $4, COALESCE($5, $6)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Income>(&query)
            .bind(input.amount)
            .bind(&input.description)
            .bind(input.entry_date)
            .bind(input.project_id)
            .bind(input.status_id)
            .bind(IncomeStatus::Received.id())
            .fetch_one(pool)
            .await
    }

    /// Find an income entry by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Income>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM incomes WHERE id = $1");
        sqlx::query_as::<_, Income>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List income entries, newest first, with optional project and
    /// date-range filters.
    pub async fn list(pool: &PgPool, filter: &LedgerFilter) -> Result<Vec<Income>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM incomes \
             WHERE ($1::BIGINT IS NULL OR project_id = $1) \
               AND ($2::TIMESTAMPTZ IS NULL OR entry_date >= $2) \
               AND ($3::TIMESTAMPTZ IS NULL OR entry_date <= $3) \
             ORDER BY entry_date DESC, id DESC"
        );
        sqlx::query_as::<_, Income>(&query)
            .bind(filter.project_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(pool)
            .await
    }

    /// Update an income entry. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIncome,
    ) -> Result<Option<Income>, sqlx::Error> {
        let query = format!(
            "UPDATE incomes SET
                amount = COALESCE($2, amount),
                description = COALESCE($3, description),
                entry_date = COALESCE($4, entry_date),
                project_id = COALESCE($5, project_id),
                status_id = COALESCE($6, status_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Income>(&query)
            .bind(id)
            .bind(input.amount)
            .bind(&input.description)
            .bind(input.entry_date)
            .bind(input.project_id)
            .bind(input.status_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an income entry, returning the deleted row so the caller can
    /// recompute the owning project's finances.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Income>, sqlx::Error> {
        let query = format!("DELETE FROM incomes WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Income>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Sum of Received income for a project.
    ///
    /// Pending rows are the outstanding contract balance, not money in the
    /// bank, so they never count toward `received_amt`.
    pub async fn sum_received_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Money, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM incomes \
             WHERE project_id = $1 AND status_id = $2",
        )
        .bind(project_id)
        .bind(IncomeStatus::Received.id())
        .fetch_one(pool)
        .await
    }

    /// The oldest Pending income row for a project, if any.
    pub async fn find_pending_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<Income>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM incomes \
             WHERE project_id = $1 AND status_id = $2 \
             ORDER BY entry_date, id LIMIT 1"
        );
        sqlx::query_as::<_, Income>(&query)
            .bind(project_id)
            .bind(IncomeStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// Convert the oldest Pending income row for a project to Received,
    /// stamping the conversion time. Returns `true` if a row was converted;
    /// a project with no pending row is a no-op, not an error.
    pub async fn convert_pending(pool: &PgPool, project_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE incomes SET status_id = $3, entry_date = NOW() \
             WHERE id = (SELECT id FROM incomes \
                         WHERE project_id = $1 AND status_id = $2 \
                         ORDER BY entry_date, id LIMIT 1)",
        )
        .bind(project_id)
        .bind(IncomeStatus::Pending.id())
        .bind(IncomeStatus::Received.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
