pub mod budget;
pub mod expense;
pub mod money;
pub mod period;
pub mod report;

pub use budget::{Budget, BudgetStatus};
pub use expense::{Expense, ExpenseDraft, ExpenseError, ExpenseFilter, ExpenseId, ValidatedExpense};
pub use money::Money;
pub use period::{DateRange, InvalidMonth, Month};
pub use report::{CategoryTotal, MonthlyTotal, SpendingReport};
