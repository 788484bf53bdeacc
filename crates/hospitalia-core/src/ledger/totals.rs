use serde::{Deserialize, Serialize};

use super::form::{FormField, FormInput};

/// How the prior-balance field feeds the running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorBalanceMode {
    /// Each submission's prior balance replaces the tracked value. Blank or
    /// unreadable text replaces it with zero.
    #[default]
    Overwrite,
    /// Every submission's prior balance is added to the tracked value.
    Accumulate,
}

/// Parsed figures of one submission, after silent-zero coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub income: f64,
    pub expense: f64,
    pub prior_balance: f64,
    pub dollars: f64,
}

impl Contribution {
    pub fn from_input(input: &FormInput) -> Self {
        Self {
            income: input.amount(FormField::Income).or_zero(),
            expense: input.amount(FormField::Expense).or_zero(),
            prior_balance: input.amount(FormField::PriorBalance).or_zero(),
            dollars: input.amount(FormField::Dollars).or_zero(),
        }
    }
}

/// Session aggregates since the last clear.
///
/// The balance is not stored: it is always income + prior balance - expense.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningTotals {
    income: f64,
    expense: f64,
    prior_balance: f64,
    dollars: f64,
}

impl RunningTotals {
    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn expense(&self) -> f64 {
        self.expense
    }

    pub fn prior_balance(&self) -> f64 {
        self.prior_balance
    }

    pub fn dollars(&self) -> f64 {
        self.dollars
    }

    pub fn balance(&self) -> f64 {
        self.income + self.prior_balance - self.expense
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Fold one submission into the totals.
    pub fn record(&mut self, contribution: &Contribution, mode: PriorBalanceMode) {
        self.income += contribution.income;
        self.expense += contribution.expense;
        self.dollars += contribution.dollars;

        match mode {
            PriorBalanceMode::Accumulate => {
                self.prior_balance += contribution.prior_balance;
            }
            PriorBalanceMode::Overwrite => {
                self.prior_balance = contribution.prior_balance;
            }
        }
    }
}
