pub mod budgets;
pub mod expenses;
pub mod receipts;
pub mod reports;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full HTTP API. `max_upload_bytes` caps every request body.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route(
            "/api/expenses/{id}",
            get(expenses::get_expense)
                .put(expenses::replace_expense)
                .delete(expenses::delete_expense),
        )
        .route("/api/summary", get(reports::summary))
        .route("/api/reports", get(reports::spending_report))
        .route(
            "/api/budgets",
            get(budgets::list_budgets).post(budgets::set_budget),
        )
        .route("/api/receipts", post(receipts::upload_receipt))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
