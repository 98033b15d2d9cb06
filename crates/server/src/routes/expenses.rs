use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use tally_core::{Expense, ExpenseDraft, ExpenseFilter, ExpenseId, ValidatedExpense};

use crate::error::ApiError;
use crate::state::AppState;

/// Query string of the expense list. Empty values mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<ExpenseFilter, ApiError> {
        Ok(ExpenseFilter {
            category: non_empty(self.category),
            start_date: parse_date_param("start_date", self.start_date)?,
            end_date: parse_date_param("end_date", self.end_date)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_date_param(name: &str, value: Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    non_empty(value)
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|_| ApiError::BadRequest(format!("Invalid {name} '{v}': expected YYYY-MM-DD")))
        })
        .transpose()
}

fn not_found(id: ExpenseId) -> ApiError {
    ApiError::NotFound(format!("Expense {id} not found"))
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let filter = query.into_filter()?;
    let expenses = tally_storage::list_expenses(&state.db, &filter).await?;
    Ok(Json(expenses))
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(draft): Json<ExpenseDraft>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let today = chrono::Local::now().date_naive();
    let validated = ValidatedExpense::for_create(draft, today)?;
    let expense = tally_storage::insert_expense(&state.db, &validated).await?;
    tracing::info!(id = %expense.id, amount = %expense.amount, category = %expense.category, "expense created");
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, ApiError> {
    let id = ExpenseId(id);
    tally_storage::get_expense(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn replace_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<ExpenseDraft>,
) -> Result<Json<Expense>, ApiError> {
    let id = ExpenseId(id);
    let validated = ValidatedExpense::for_update(draft)?;
    let expense = tally_storage::update_expense(&state.db, id, &validated)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(%id, "expense replaced");
    Ok(Json(expense))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let id = ExpenseId(id);
    if tally_storage::delete_expense(&state.db, id).await? {
        tracing::info!(%id, "expense deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_values_are_ignored() {
        let q = ListQuery {
            category: Some("  ".into()),
            start_date: Some(String::new()),
            end_date: None,
        };
        assert_eq!(q.into_filter().unwrap(), ExpenseFilter::default());
    }

    #[test]
    fn malformed_date_param_is_rejected() {
        let q = ListQuery { start_date: Some("15/03/2024".into()), ..Default::default() };
        assert!(matches!(q.into_filter(), Err(ApiError::BadRequest(m)) if m.contains("start_date")));
    }
}
