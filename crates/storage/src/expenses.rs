use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};
use tally_core::{Expense, ExpenseFilter, ExpenseId, Money, Month, ValidatedExpense};

use crate::db::{to_cents, DbPool};

type ExpenseRow = (i64, i64, String, Option<String>, NaiveDate);

const EXPENSE_COLUMNS: &str = "id, amount_cents, category, description, date";

fn row_to_expense(r: ExpenseRow) -> Expense {
    Expense {
        id: ExpenseId(r.0),
        amount: Money::from_cents(r.1),
        category: r.2,
        description: r.3,
        date: r.4,
    }
}

pub async fn insert_expense(pool: &DbPool, expense: &ValidatedExpense) -> Result<Expense, sqlx::Error> {
    let row = sqlx::query_as::<_, ExpenseRow>(&format!(
        "INSERT INTO expenses (amount_cents, category, description, date) VALUES (?, ?, ?, ?) RETURNING {EXPENSE_COLUMNS}"
    ))
    .bind(to_cents(expense.amount)?)
    .bind(&expense.category)
    .bind(&expense.description)
    .bind(expense.date)
    .fetch_one(pool)
    .await?;

    Ok(row_to_expense(row))
}

pub async fn get_expense(pool: &DbPool, id: ExpenseId) -> Result<Option<Expense>, sqlx::Error> {
    let row = sqlx::query_as::<_, ExpenseRow>(&format!(
        "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?"
    ))
    .bind(id.0)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_expense))
}

/// Replace every field of an existing expense. Returns `None` if `id` is unknown.
pub async fn update_expense(
    pool: &DbPool,
    id: ExpenseId,
    expense: &ValidatedExpense,
) -> Result<Option<Expense>, sqlx::Error> {
    let row = sqlx::query_as::<_, ExpenseRow>(&format!(
        "UPDATE expenses SET amount_cents = ?, category = ?, description = ?, date = ? WHERE id = ? RETURNING {EXPENSE_COLUMNS}"
    ))
    .bind(to_cents(expense.amount)?)
    .bind(&expense.category)
    .bind(&expense.description)
    .bind(expense.date)
    .bind(id.0)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_expense))
}

/// Returns whether a row was deleted.
pub async fn delete_expense(pool: &DbPool, id: ExpenseId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(id.0)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Newest first.
pub async fn list_expenses(pool: &DbPool, filter: &ExpenseFilter) -> Result<Vec<Expense>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE 1 = 1"));

    if let Some(category) = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        qb.push(" AND category LIKE ").push_bind(format!("%{category}%"));
    }
    if let Some(start) = filter.start_date {
        qb.push(" AND date >= ").push_bind(start);
    }
    if let Some(end) = filter.end_date {
        qb.push(" AND date <= ").push_bind(end);
    }
    qb.push(" ORDER BY date DESC, id DESC");

    let rows = qb.build_query_as::<ExpenseRow>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(row_to_expense).collect())
}

pub async fn total_spent(pool: &DbPool) -> Result<Money, sqlx::Error> {
    let cents: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(amount_cents), 0) FROM expenses")
        .fetch_one(pool)
        .await?;
    Ok(Money::from_cents(cents))
}

pub async fn month_spent(pool: &DbPool, month: Month) -> Result<Money, sqlx::Error> {
    let range = month.range();
    let cents: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount_cents), 0) FROM expenses WHERE date >= ? AND date <= ?",
    )
    .bind(range.start)
    .bind(range.end)
    .fetch_one(pool)
    .await?;
    Ok(Money::from_cents(cents))
}
