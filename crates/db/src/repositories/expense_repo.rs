//! Repository for the `expenses` table.

use sqlx::PgPool;

use shutterdesk_core::types::{DbId, Money};

use crate::models::expense::{CreateExpense, Expense, UpdateExpense};
use crate::repositories::income_repo::LedgerFilter;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, amount, category, description, entry_date, project_id, created_at, updated_at";

/// Provides CRUD and aggregate operations for expense entries.
pub struct ExpenseRepo;

impl ExpenseRepo {
    /// Insert a new expense entry, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateExpense) -> Result<Expense, sqlx::Error> {
        let query = format!(
            "INSERT INTO expenses (amount, category, description, entry_date, project_id) \
             VALUES ($1, $2, $3, COALESCE($4, NOW()), $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(input.amount)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.entry_date)
            .bind(input.project_id)
            .fetch_one(pool)
            .await
    }

    /// Find an expense entry by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expenses WHERE id = $1");
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List expense entries, newest first, with optional project and
    /// date-range filters.
    pub async fn list(pool: &PgPool, filter: &LedgerFilter) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM expenses \
             WHERE ($1::BIGINT IS NULL OR project_id = $1) \
               AND ($2::TIMESTAMPTZ IS NULL OR entry_date >= $2) \
               AND ($3::TIMESTAMPTZ IS NULL OR entry_date <= $3) \
             ORDER BY entry_date DESC, id DESC"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(filter.project_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(pool)
            .await
    }

    /// Update an expense entry. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateExpense,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!(
            "UPDATE expenses SET
                amount = COALESCE($2, amount),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                entry_date = COALESCE($5, entry_date),
                project_id = COALESCE($6, project_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(input.amount)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.entry_date)
            .bind(input.project_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an expense entry, returning the deleted row so the caller can
    /// recompute the owning project's finances.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!("DELETE FROM expenses WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Total expenses recorded against a project.
    pub async fn sum_for_project(pool: &PgPool, project_id: DbId) -> Result<Money, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM expenses WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }
}
