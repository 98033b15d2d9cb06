use serde::{Deserialize, Serialize};

use super::money::Money;
use super::period::Month;

/// Spending limit for one calendar month. At most one per month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub month: Month,
    pub amount: Money,
}

/// Spending for a month measured against its budget, if one is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub month: Month,
    pub spent: Money,
    pub budget: Option<Money>,
}

impl BudgetStatus {
    pub fn new(month: Month, spent: Money, budget: Option<Money>) -> Self {
        BudgetStatus { month, spent, budget }
    }

    /// True only when a budget exists and spending strictly exceeds it.
    pub fn over_budget(&self) -> bool {
        self.budget.is_some_and(|b| self.spent > b)
    }

    pub fn remaining(&self) -> Option<Money> {
        self.budget.map(|b| b - self.spent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march() -> Month {
        Month::new(2024, 3).unwrap()
    }

    #[test]
    fn no_budget_is_never_over() {
        let s = BudgetStatus::new(march(), Money::from_cents(1_000_000), None);
        assert!(!s.over_budget());
        assert_eq!(s.remaining(), None);
    }

    #[test]
    fn spending_equal_to_budget_is_not_over() {
        let s = BudgetStatus::new(march(), Money::from_cents(500), Some(Money::from_cents(500)));
        assert!(!s.over_budget());
        assert_eq!(s.remaining(), Some(Money::zero()));
    }

    #[test]
    fn spending_above_budget_is_over() {
        let s = BudgetStatus::new(march(), Money::from_cents(501), Some(Money::from_cents(500)));
        assert!(s.over_budget());
        assert_eq!(s.remaining(), Some(Money::from_cents(-1)));
    }
}
