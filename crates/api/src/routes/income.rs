//! Route definitions for the `/incomes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::income;
use crate::state::AppState;

/// Routes mounted at `/incomes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(income::list).post(income::create))
        .route(
            "/{id}",
            get(income::get_by_id)
                .put(income::update)
                .delete(income::delete),
        )
}
