//! Integration tests for aggregate sums and the completion transaction.

use sqlx::PgPool;

use shutterdesk_db::models::income::CreateIncome;
use shutterdesk_db::models::project::CreateProject;
use shutterdesk_db::models::status::{IncomeStatus, ProjectStatus};
use shutterdesk_db::repositories::{ExpenseRepo, IncomeRepo, ProjectRepo};

fn new_project(code: &str, amount: i64) -> CreateProject {
    CreateProject {
        code: code.to_string(),
        name: None,
        company: None,
        project_type: None,
        status_id: None,
        shoot_start_date: None,
        shoot_end_date: None,
        amount,
        outsourcing_amt: 0,
    }
}

fn received_income(project_id: i64, amount: i64) -> CreateIncome {
    CreateIncome {
        amount,
        description: None,
        entry_date: None,
        project_id: Some(project_id),
        status_id: Some(IncomeStatus::Received.id()),
    }
}

// ---------------------------------------------------------------------------
// Sums
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_received_sum_excludes_pending(pool: PgPool) {
    // amount > 0 seeds a Pending row for the full 80_000.
    let project = ProjectRepo::create(&pool, &new_project("SUM-1", 80_000))
        .await
        .unwrap();
    IncomeRepo::create(&pool, &received_income(project.id, 30_000))
        .await
        .unwrap();

    let sum = IncomeRepo::sum_received_for_project(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(sum, 30_000);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sums_are_zero_for_empty_ledger(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("SUM-2", 0)).await.unwrap();
    assert_eq!(
        IncomeRepo::sum_received_for_project(&pool, project.id).await.unwrap(),
        0
    );
    assert_eq!(ExpenseRepo::sum_for_project(&pool, project.id).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// complete_and_convert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_complete_and_convert_flips_both(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("CC-1", 40_000))
        .await
        .unwrap();

    let write = ProjectRepo::complete_and_convert(&pool, project.id)
        .await
        .unwrap();
    assert!(write.status_changed);
    assert!(write.income_converted);

    let reloaded = ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status_id, Some(ProjectStatus::Completed.id()));

    // The pending row is gone; its amount now counts as received.
    assert!(IncomeRepo::find_pending_for_project(&pool, project.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        IncomeRepo::sum_received_for_project(&pool, project.id).await.unwrap(),
        40_000
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_complete_and_convert_is_idempotent(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("CC-2", 40_000))
        .await
        .unwrap();

    let first = ProjectRepo::complete_and_convert(&pool, project.id).await.unwrap();
    assert!(first.status_changed);

    let second = ProjectRepo::complete_and_convert(&pool, project.id).await.unwrap();
    assert!(!second.status_changed);
    assert!(!second.income_converted);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_complete_without_pending_income_is_noop_on_ledger(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("CC-3", 0)).await.unwrap();

    let write = ProjectRepo::complete_and_convert(&pool, project.id).await.unwrap();
    assert!(write.status_changed);
    assert!(!write.income_converted);
}
