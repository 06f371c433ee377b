//! Batch validation and repair of derived financial fields.
//!
//! The stored `received_amt` / `pending_amt` / `profit` columns are a cache
//! of the ledger. An interrupted process between a status write and a
//! finance recompute, or a manual edit, can leave them stale; the functions
//! here detect that drift and repair it. Comparison is exact numeric
//! equality, never an epsilon: amounts are discrete currency units.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;

use shutterdesk_core::finance::FinancialSnapshot;
use shutterdesk_core::types::{DbId, Money, Timestamp};
use shutterdesk_db::models::project::Project;
use shutterdesk_db::repositories::ProjectRepo;

use crate::engine::finances::{expected_finances, recompute_project_finances};
use crate::error::AppResult;

/// One stored-vs-expected mismatch on a single derived field.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialIssue {
    pub project_id: DbId,
    pub code: String,
    pub field: &'static str,
    pub stored: Money,
    pub expected: Money,
}

/// Result of a read-only consistency validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub checked: usize,
    pub consistent: usize,
    pub inconsistent: usize,
    /// Projects that could not be checked (query failures); the scan
    /// continues past them.
    pub errors: usize,
    pub issues: Vec<FinancialIssue>,
    pub recommendations: Vec<String>,
}

/// Result of a full reconciliation scan with aggregate totals.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialValidationResult {
    pub checked: usize,
    pub consistent: usize,
    pub inconsistent: usize,
    pub errors: usize,
    pub total_issues: usize,
    pub issues: Vec<FinancialIssue>,
}

/// One field repaired by the corrector.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionEntry {
    pub project_id: DbId,
    pub code: String,
    pub field: &'static str,
    pub previous: Money,
    pub corrected: Money,
}

/// Result of an automated correction pass.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionResult {
    pub checked: usize,
    pub corrected_projects: usize,
    pub errors: usize,
    pub corrections: Vec<CorrectionEntry>,
}

/// Aggregate consistency summary.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationStats {
    pub total_projects: usize,
    pub consistent_projects: usize,
    pub inconsistent_projects: usize,
    pub total_issues: usize,
    /// Share of consistent projects, 0-100. 100 for an empty database.
    pub consistency_pct: f64,
    pub checked_at: Timestamp,
}

/// Diff a project's stored derived fields against an expected snapshot.
fn diff_project(project: &Project, expected: &FinancialSnapshot) -> Vec<FinancialIssue> {
    let mut issues = Vec::new();
    let fields: [(&'static str, Money, Money); 3] = [
        ("received_amt", project.received_amt, expected.received_amt),
        ("pending_amt", project.pending_amt, expected.pending_amt),
        ("profit", project.profit, expected.profit),
    ];
    for (field, stored, want) in fields {
        if stored != want {
            issues.push(FinancialIssue {
                project_id: project.id,
                code: project.code.clone(),
                field,
                stored,
                expected: want,
            });
        }
    }
    issues
}

/// Scan every project and diff stored derived fields against the ledger.
///
/// Shared by the validate/reconcile/correct entry points. A project whose
/// sums cannot be computed is logged, counted, and skipped.
async fn scan(pool: &PgPool) -> AppResult<FinancialValidationResult> {
    let projects = ProjectRepo::list(pool).await?;

    let mut result = FinancialValidationResult {
        checked: projects.len(),
        consistent: 0,
        inconsistent: 0,
        errors: 0,
        total_issues: 0,
        issues: Vec::new(),
    };

    for project in &projects {
        let expected = match expected_finances(pool, project).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    project_id = project.id,
                    code = %project.code,
                    error = %e,
                    "Reconciliation scan failed for project"
                );
                result.errors += 1;
                continue;
            }
        };

        let issues = diff_project(project, &expected);
        if issues.is_empty() {
            result.consistent += 1;
        } else {
            result.inconsistent += 1;
            result.total_issues += issues.len();
            result.issues.extend(issues);
        }
    }

    Ok(result)
}

/// Read-only consistency check with remediation hints.
pub async fn validate_financial_consistency(pool: &PgPool) -> AppResult<ValidationResult> {
    let scan = scan(pool).await?;

    let mut recommendations = Vec::new();
    if scan.inconsistent > 0 {
        recommendations.push(format!(
            "Run automated corrections to repair {} inconsistent project(s)",
            scan.inconsistent
        ));
    }
    if scan.errors > 0 {
        recommendations.push(format!(
            "{} project(s) could not be checked; inspect the logs",
            scan.errors
        ));
    }

    Ok(ValidationResult {
        checked: scan.checked,
        consistent: scan.consistent,
        inconsistent: scan.inconsistent,
        errors: scan.errors,
        issues: scan.issues,
        recommendations,
    })
}

/// Full reconciliation scan with aggregate totals.
pub async fn reconcile_project_finances(pool: &PgPool) -> AppResult<FinancialValidationResult> {
    let result = scan(pool).await?;
    tracing::info!(
        checked = result.checked,
        consistent = result.consistent,
        inconsistent = result.inconsistent,
        total_issues = result.total_issues,
        "Reconciliation scan finished"
    );
    Ok(result)
}

/// Repair every inconsistent project by re-running the ledger aggregator.
///
/// Partial failure is tolerated: a project that fails to correct is logged
/// and counted, and the loop continues. Running this twice in a row is a
/// fixed point; the second pass finds nothing to repair.
pub async fn perform_automated_corrections(pool: &PgPool) -> AppResult<CorrectionResult> {
    let scan = scan(pool).await?;

    let mut result = CorrectionResult {
        checked: scan.checked,
        corrected_projects: 0,
        errors: scan.errors,
        corrections: Vec::new(),
    };

    // Issues are grouped per project; one recompute repairs all of them.
    let mut project_ids: Vec<DbId> = scan.issues.iter().map(|i| i.project_id).collect();
    project_ids.dedup();

    for project_id in project_ids {
        match recompute_project_finances(pool, project_id).await {
            Ok(()) => {
                result.corrected_projects += 1;
                for issue in scan.issues.iter().filter(|i| i.project_id == project_id) {
                    tracing::info!(
                        project_id,
                        code = %issue.code,
                        field = issue.field,
                        previous = issue.stored,
                        corrected = issue.expected,
                        "Corrected drifted financial field"
                    );
                    result.corrections.push(CorrectionEntry {
                        project_id,
                        code: issue.code.clone(),
                        field: issue.field,
                        previous: issue.stored,
                        corrected: issue.expected,
                    });
                }
            }
            Err(e) => {
                tracing::warn!(project_id, error = %e, "Correction failed for project");
                result.errors += 1;
            }
        }
    }

    Ok(result)
}

/// Aggregate consistency summary for dashboards and the stats endpoint.
pub async fn reconciliation_stats(pool: &PgPool) -> AppResult<ReconciliationStats> {
    let scan = scan(pool).await?;

    let consistency_pct = if scan.checked == 0 {
        100.0
    } else {
        scan.consistent as f64 * 100.0 / scan.checked as f64
    };

    Ok(ReconciliationStats {
        total_projects: scan.checked,
        consistent_projects: scan.consistent,
        inconsistent_projects: scan.inconsistent,
        total_issues: scan.total_issues,
        consistency_pct,
        checked_at: Utc::now(),
    })
}
