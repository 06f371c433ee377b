//! HTTP-level integration tests for the project endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Project CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/projects",
        serde_json::json!({"code": "WED-2026-001", "name": "Sharma Wedding", "amount": 100000}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "WED-2026-001");
    assert_eq!(json["amount"], 100000);
    assert_eq!(json["received_amt"], 0);
    assert_eq!(json["pending_amt"], 100000);
    assert!(json["id"].is_number());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_seeds_pending_income(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/projects",
            serde_json::json!({"code": "WED-2026-002", "amount": 50000}),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let incomes = body_json(get(app, &format!("/api/v1/incomes?project_id={id}")).await).await;
    let rows = incomes.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["amount"], 50000);
    // 1 = pending (income_statuses seed order)
    assert_eq!(rows[0]["status_id"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_with_blank_code_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/projects",
        serde_json::json!({"code": "  ", "amount": 1000}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_code_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/projects",
        serde_json::json!({"code": "DUP-1"}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/projects",
        serde_json::json!({"code": "DUP-1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_nonexistent_project_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/projects/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_amount_recomputes_finances(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/projects",
            serde_json::json!({"code": "UPD-1", "amount": 10000}),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/projects/{id}"),
        serde_json::json!({"amount": 25000, "outsourcing_amt": 5000}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["amount"], 25000);
    assert_eq!(json["pending_amt"], 25000);
    assert_eq!(json["profit"], 20000);
}

// ---------------------------------------------------------------------------
// Delete semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_with_ledger_rows_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/projects",
            serde_json::json!({"code": "DEL-1", "amount": 10000}),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // The seeded pending income blocks a plain delete.
    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_force_delete_cascades(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/projects",
            serde_json::json!({"code": "DEL-2", "amount": 10000}),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/projects/{id}?force=true")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_without_ledger_rows_succeeds(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/projects",
            serde_json::json!({"code": "DEL-3", "amount": 0}),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
