pub mod budgets;
pub mod db;
pub mod expenses;
pub mod reports;

pub use budgets::{get_budget, list_budgets, upsert_budget};
pub use db::{create_db, DbPool};
pub use expenses::{
    delete_expense, get_expense, insert_expense, list_expenses, month_spent, total_spent,
    update_expense,
};
pub use reports::{budget_status, category_totals, monthly_totals, spending_report};
