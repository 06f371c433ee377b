//! Project entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shutterdesk_core::types::{DbId, Money, Timestamp};

use crate::models::status::StatusId;

/// A project row from the `projects` table.
///
/// `received_amt`, `pending_amt`, and `profit` are derived from the ledger
/// by the finance recompute path; treat them as a cache of the ledger, not
/// an independent source of truth.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    /// Unique human-readable code, e.g. `WED-2026-014`.
    pub code: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub project_type: Option<String>,
    pub status_id: Option<StatusId>,
    pub shoot_start_date: Option<NaiveDate>,
    pub shoot_end_date: Option<NaiveDate>,
    /// Contracted total for the project.
    pub amount: Money,
    /// Fixed outsourcing cost subtracted from profit.
    pub outsourcing_amt: Money,
    pub received_amt: Money,
    pub pending_amt: Money,
    pub profit: Money,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub code: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub project_type: Option<String>,
    pub status_id: Option<StatusId>,
    pub shoot_start_date: Option<NaiveDate>,
    pub shoot_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub amount: Money,
    #[serde(default)]
    pub outsourcing_amt: Money,
}

/// DTO for updating an existing project. All fields are optional; derived
/// financial fields are never writable through this DTO.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub code: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub project_type: Option<String>,
    pub status_id: Option<StatusId>,
    pub shoot_start_date: Option<NaiveDate>,
    pub shoot_end_date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub outsourcing_amt: Option<Money>,
}
