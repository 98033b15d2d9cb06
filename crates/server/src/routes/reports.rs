use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tally_core::{Money, Month, SpendingReport};

use crate::error::ApiError;
use crate::state::AppState;

/// Dashboard numbers: all-time total plus the current month against its budget.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: Money,
    pub month: Month,
    pub month_spent: Money,
    pub month_budget: Option<Money>,
    /// Budget minus spending; negative once over budget.
    pub month_remaining: Option<Money>,
    pub over_budget: bool,
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<Summary>, ApiError> {
    let total = tally_storage::total_spent(&state.db).await?;
    let status = tally_storage::budget_status(&state.db, Month::current()).await?;
    Ok(Json(Summary {
        total,
        month: status.month,
        month_spent: status.spent,
        month_budget: status.budget,
        month_remaining: status.remaining(),
        over_budget: status.over_budget(),
    }))
}

pub async fn spending_report(State(state): State<AppState>) -> Result<Json<SpendingReport>, ApiError> {
    Ok(Json(tally_storage::spending_report(&state.db).await?))
}
