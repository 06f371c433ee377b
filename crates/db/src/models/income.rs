//! Income ledger entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shutterdesk_core::types::{DbId, Money, Timestamp};

use crate::models::status::StatusId;

/// One ledger credit from the `incomes` table.
///
/// `status_id` distinguishes the auto-generated Pending entry awaiting
/// project completion from money actually received.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Income {
    pub id: DbId,
    pub amount: Money,
    pub description: Option<String>,
    pub entry_date: Timestamp,
    pub project_id: Option<DbId>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an income entry. Manual entries default to Received.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIncome {
    pub amount: Money,
    pub description: Option<String>,
    pub entry_date: Option<Timestamp>,
    pub project_id: Option<DbId>,
    pub status_id: Option<StatusId>,
}

/// DTO for updating an income entry. All fields are optional; only non-`None`
/// fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIncome {
    pub amount: Option<Money>,
    pub description: Option<String>,
    pub entry_date: Option<Timestamp>,
    pub project_id: Option<DbId>,
    pub status_id: Option<StatusId>,
}
