//! Expense ledger entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shutterdesk_core::types::{DbId, Money, Timestamp};

/// One ledger debit from the `expenses` table. Never auto-generated and
/// never subject to status conversion.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Expense {
    pub id: DbId,
    pub amount: Money,
    pub category: Option<String>,
    pub description: Option<String>,
    pub entry_date: Timestamp,
    pub project_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an expense entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpense {
    pub amount: Money,
    pub category: Option<String>,
    pub description: Option<String>,
    pub entry_date: Option<Timestamp>,
    pub project_id: Option<DbId>,
}

/// DTO for updating an expense entry. All fields are optional; only
/// non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExpense {
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub entry_date: Option<Timestamp>,
    pub project_id: Option<DbId>,
}
