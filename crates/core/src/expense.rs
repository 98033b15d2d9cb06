use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseId(pub i64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    #[error("Amount is required")]
    MissingAmount,
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),
    #[error("Category is required")]
    MissingCategory,
    #[error("Date is required")]
    MissingDate,
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// A persisted expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Money,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Expense fields exactly as the user submitted them, possibly pre-filled
/// from a scanned receipt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseDraft {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedExpense {
    pub amount: Money,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl ValidatedExpense {
    /// Validate a new expense. An empty date falls back to `today`.
    pub fn for_create(draft: ExpenseDraft, today: NaiveDate) -> Result<Self, ExpenseError> {
        Self::validate(draft, Some(today))
    }

    /// Validate a full-record replacement. Every required field must be present.
    pub fn for_update(draft: ExpenseDraft) -> Result<Self, ExpenseError> {
        Self::validate(draft, None)
    }

    fn validate(draft: ExpenseDraft, default_date: Option<NaiveDate>) -> Result<Self, ExpenseError> {
        let raw_amount = draft.amount.trim();
        if raw_amount.is_empty() {
            return Err(ExpenseError::MissingAmount);
        }
        let amount: Money = raw_amount
            .parse()
            .map_err(|_| ExpenseError::InvalidAmount(raw_amount.to_string()))?;
        if amount.to_cents().is_none() {
            return Err(ExpenseError::InvalidAmount(raw_amount.to_string()));
        }

        let category = draft.category.trim();
        if category.is_empty() {
            return Err(ExpenseError::MissingCategory);
        }

        let date = match draft.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ExpenseError::InvalidDate(raw.to_string()))?,
            None => default_date.ok_or(ExpenseError::MissingDate)?,
        };

        let description = draft
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(ValidatedExpense {
            amount,
            category: category.to_string(),
            description,
            date,
        })
    }
}

/// Optional filters for listing expenses. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    /// Case-insensitive substring match on the category.
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
