use tally_core::{Budget, Money, Month};

use crate::db::{to_cents, DbPool};

fn row_to_budget((month, cents): (String, i64)) -> Result<Budget, sqlx::Error> {
    let month: Month = month.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(Budget { month, amount: Money::from_cents(cents) })
}

/// Insert the budget for `month`, or overwrite the existing amount.
pub async fn upsert_budget(pool: &DbPool, month: Month, amount: Money) -> Result<Budget, sqlx::Error> {
    let row = sqlx::query_as::<_, (String, i64)>(
        r#"
        INSERT INTO budgets (month, amount_cents) VALUES (?, ?)
        ON CONFLICT (month) DO UPDATE SET
            amount_cents = excluded.amount_cents,
            updated_at = datetime('now')
        RETURNING month, amount_cents
        "#,
    )
    .bind(month.to_string())
    .bind(to_cents(amount)?)
    .fetch_one(pool)
    .await?;

    row_to_budget(row)
}

pub async fn get_budget(pool: &DbPool, month: Month) -> Result<Option<Budget>, sqlx::Error> {
    let row = sqlx::query_as::<_, (String, i64)>(
        "SELECT month, amount_cents FROM budgets WHERE month = ?",
    )
    .bind(month.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(row_to_budget).transpose()
}

/// Most recent month first.
pub async fn list_budgets(pool: &DbPool) -> Result<Vec<Budget>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT month, amount_cents FROM budgets ORDER BY month DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_budget).collect()
}
