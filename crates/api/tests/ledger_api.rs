//! HTTP-level integration tests for the income/expense ledger and the
//! finance recompute pipeline behind it.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, delete, get, post_json, put_json};
use sqlx::PgPool;

async fn create_project(pool: &PgPool, code: &str, amount: i64, outsourcing: i64) -> i64 {
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/projects",
            serde_json::json!({"code": code, "amount": amount, "outsourcing_amt": outsourcing}),
        )
        .await,
    )
    .await;
    created["id"].as_i64().unwrap()
}

async fn get_project(pool: &PgPool, id: i64) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    body_json(get(app, &format!("/api/v1/projects/{id}")).await).await
}

// ---------------------------------------------------------------------------
// Recompute triggers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_income_create_recomputes_project(pool: PgPool) {
    let id = create_project(&pool, "LED-1", 100_000, 0).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/incomes",
        serde_json::json!({"amount": 60000, "project_id": id, "description": "advance"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let project = get_project(&pool, id).await;
    assert_eq!(project["received_amt"], 60000);
    assert_eq!(project["pending_amt"], 40000);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_expense_create_recomputes_profit(pool: PgPool) {
    let id = create_project(&pool, "LED-2", 100_000, 5_000).await;

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/expenses",
        serde_json::json!({"amount": 10000, "project_id": id, "category": "travel"}),
    )
    .await;

    let project = get_project(&pool, id).await;
    assert_eq!(project["profit"], 85000);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_income_delete_recomputes_project(pool: PgPool) {
    let id = create_project(&pool, "LED-3", 100_000, 0).await;

    let app = common::build_test_app(pool.clone());
    let income = body_json(
        post_json(
            app,
            "/api/v1/incomes",
            serde_json::json!({"amount": 30000, "project_id": id}),
        )
        .await,
    )
    .await;
    let income_id = income["id"].as_i64().unwrap();

    assert_eq!(get_project(&pool, id).await["received_amt"], 30000);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/incomes/{income_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(get_project(&pool, id).await["received_amt"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_income_move_recomputes_both_projects(pool: PgPool) {
    let a = create_project(&pool, "LED-4A", 50_000, 0).await;
    let b = create_project(&pool, "LED-4B", 50_000, 0).await;

    let app = common::build_test_app(pool.clone());
    let income = body_json(
        post_json(
            app,
            "/api/v1/incomes",
            serde_json::json!({"amount": 20000, "project_id": a}),
        )
        .await,
    )
    .await;
    let income_id = income["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    put_json(
        app,
        &format!("/api/v1/incomes/{income_id}"),
        serde_json::json!({"project_id": b}),
    )
    .await;

    assert_eq!(get_project(&pool, a).await["received_amt"], 0);
    assert_eq!(get_project(&pool, b).await["received_amt"], 20000);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_income_referencing_missing_project_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/incomes",
        serde_json::json!({"amount": 1000, "project_id": 424242}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_negative_amount_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/expenses", serde_json::json!({"amount": -5})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Worked example: amount 100000, income 60000, expense 10000,
// outsourcing 5000, shoot ended yesterday
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_worked_example_under_threshold(pool: PgPool) {
    let yesterday = (Utc::now().date_naive() - Duration::days(1)).to_string();

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/projects",
            serde_json::json!({
                "code": "EX-1",
                "amount": 100000,
                "outsourcing_amt": 5000,
                "shoot_end_date": yesterday,
            }),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/incomes",
        serde_json::json!({"amount": 60000, "project_id": id}),
    )
    .await;
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/expenses",
        serde_json::json!({"amount": 10000, "project_id": id}),
    )
    .await;

    let project = get_project(&pool, id).await;
    assert_eq!(project["received_amt"], 60000);
    assert_eq!(project["pending_amt"], 40000);
    assert_eq!(project["profit"], 85000);

    // 60000 < 80% of 100000: must not complete.
    let app = common::build_test_app(pool);
    let check = body_json(get(app, &format!("/api/v1/projects/{id}/completion-check")).await).await;
    assert_eq!(check["data"]["should_complete"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_worked_example_over_threshold(pool: PgPool) {
    let yesterday = (Utc::now().date_naive() - Duration::days(1)).to_string();

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/projects",
            serde_json::json!({
                "code": "EX-2",
                "amount": 100000,
                "shoot_end_date": yesterday,
            }),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/incomes",
        serde_json::json!({"amount": 85000, "project_id": id}),
    )
    .await;

    let project = get_project(&pool, id).await;
    assert_eq!(project["pending_amt"], 15000);

    let app = common::build_test_app(pool);
    let check = body_json(get(app, &format!("/api/v1/projects/{id}/completion-check")).await).await;
    assert_eq!(check["data"]["should_complete"], true);
    assert_eq!(
        check["data"]["reason"],
        "Shoot end date passed with 80% payment received"
    );
}
