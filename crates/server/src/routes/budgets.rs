use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tally_core::{Budget, Money, Month};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BudgetInput {
    /// `YYYY-MM`; the current month when absent or empty.
    #[serde(default)]
    pub month: Option<String>,
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct BudgetSaved {
    pub budget: Budget,
    pub message: String,
}

pub async fn list_budgets(State(state): State<AppState>) -> Result<Json<Vec<Budget>>, ApiError> {
    Ok(Json(tally_storage::list_budgets(&state.db).await?))
}

pub async fn set_budget(
    State(state): State<AppState>,
    Json(input): Json<BudgetInput>,
) -> Result<Json<BudgetSaved>, ApiError> {
    let month = match input.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(raw) => raw.parse::<Month>()?,
        None => Month::current(),
    };
    let invalid_amount = || ApiError::BadRequest(format!("Invalid amount: '{}'", input.amount.trim()));
    let amount: Money = input.amount.parse().map_err(|_| invalid_amount())?;
    if amount.to_cents().is_none() {
        return Err(invalid_amount());
    }

    let budget = tally_storage::upsert_budget(&state.db, month, amount).await?;
    tracing::info!(%month, %amount, "budget set");
    Ok(Json(BudgetSaved {
        message: format!("Budget for {} set to {}", budget.month, budget.amount),
        budget,
    }))
}
