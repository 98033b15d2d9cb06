use tally_core::{BudgetStatus, CategoryTotal, Money, Month, MonthlyTotal, SpendingReport};

use crate::budgets::get_budget;
use crate::db::DbPool;
use crate::expenses::month_spent;

pub async fn monthly_totals(pool: &DbPool) -> Result<Vec<MonthlyTotal>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT substr(date, 1, 7) AS month, SUM(amount_cents) AS total_cents
        FROM expenses
        GROUP BY month
        ORDER BY month
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(month, cents)| MonthlyTotal { month, total: Money::from_cents(cents) })
        .collect())
}

pub async fn category_totals(pool: &DbPool) -> Result<Vec<CategoryTotal>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT category, SUM(amount_cents) AS total_cents
        FROM expenses
        GROUP BY category
        ORDER BY category
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(category, cents)| CategoryTotal { category, total: Money::from_cents(cents) })
        .collect())
}

pub async fn spending_report(pool: &DbPool) -> Result<SpendingReport, sqlx::Error> {
    Ok(SpendingReport {
        monthly: monthly_totals(pool).await?,
        by_category: category_totals(pool).await?,
    })
}

pub async fn budget_status(pool: &DbPool, month: Month) -> Result<BudgetStatus, sqlx::Error> {
    let spent = month_spent(pool, month).await?;
    let budget = get_budget(pool, month).await?.map(|b| b.amount);
    Ok(BudgetStatus::new(month, spent, budget))
}
