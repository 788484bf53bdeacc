use serde::{Deserialize, Serialize};

use super::form::{FormField, FormInput};
use super::totals::{Contribution, RunningTotals};
use crate::utils::{format_fixed, or_placeholder, CurrencyFormat, PLACEHOLDER};

/// Date cell of the synthesized totals row.
pub const TOTALS_LABEL: &str = "Totales";

/// Currency formatters used to render rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFormat {
    /// Main ledger currency (income, expense, balances)
    pub primary: CurrencyFormat,
    /// Secondary currency for the dollars balance column
    pub secondary: CurrencyFormat,
}

impl LedgerFormat {
    pub fn new(primary: CurrencyFormat, secondary: CurrencyFormat) -> Self {
        Self { primary, secondary }
    }

    /// Pesos for the ledger, dollars for the secondary column.
    pub fn ars_usd() -> Self {
        Self::new(CurrencyFormat::ars(), CurrencyFormat::usd())
    }
}

impl Default for LedgerFormat {
    fn default() -> Self {
        Self::ars_usd()
    }
}

/// One recorded entry as display strings. Field order is column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    #[serde(rename = "Fecha")]
    pub date: String,
    #[serde(rename = "Ingresos")]
    pub income: String,
    #[serde(rename = "Egresos")]
    pub expense: String,
    #[serde(rename = "Saldo Anterior")]
    pub prior_balance: String,
    #[serde(rename = "Causa")]
    pub cause: String,
    #[serde(rename = "Observaciones")]
    pub notes: String,
    #[serde(rename = "Balance Total")]
    pub balance: String,
    #[serde(rename = "Dólares")]
    pub dollars: String,
    #[serde(rename = "Balance en Dólares")]
    pub dollar_balance: String,
}

impl LedgerRow {
    pub const COLUMNS: [&'static str; 9] = [
        "Fecha",
        "Ingresos",
        "Egresos",
        "Saldo Anterior",
        "Causa",
        "Observaciones",
        "Balance Total",
        "Dólares",
        "Balance en Dólares",
    ];

    /// Build the row for one submission. `totals` must already include
    /// the contribution.
    pub fn new(
        input: &FormInput,
        contribution: &Contribution,
        totals: &RunningTotals,
        format: &LedgerFormat,
    ) -> Self {
        let dollars = if contribution.dollars == 0.0 {
            PLACEHOLDER.to_string()
        } else {
            format_fixed(contribution.dollars)
        };

        Self {
            date: or_placeholder(input.get(FormField::Date)),
            income: format.primary.format_or_placeholder(contribution.income),
            expense: format.primary.format_or_placeholder(contribution.expense),
            prior_balance: format.primary.format_or_placeholder(contribution.prior_balance),
            cause: or_placeholder(input.get(FormField::Cause)),
            notes: or_placeholder(input.get(FormField::Notes)),
            balance: format.primary.format(totals.balance()),
            dollars,
            dollar_balance: format.secondary.format(totals.dollars()),
        }
    }

    /// The synthesized "Totales" row appended on export. Every figure is
    /// formatted, zero included.
    pub fn totals(totals: &RunningTotals, format: &LedgerFormat) -> Self {
        Self {
            date: TOTALS_LABEL.to_string(),
            income: format.primary.format(totals.income()),
            expense: format.primary.format(totals.expense()),
            prior_balance: format.primary.format(totals.prior_balance()),
            cause: PLACEHOLDER.to_string(),
            notes: PLACEHOLDER.to_string(),
            balance: format.primary.format(totals.balance()),
            dollars: format.secondary.format(totals.dollars()),
            dollar_balance: format.secondary.format(totals.dollars()),
        }
    }

    /// Cells in column order.
    pub fn cells(&self) -> [&str; 9] {
        [
            self.date.as_str(),
            self.income.as_str(),
            self.expense.as_str(),
            self.prior_balance.as_str(),
            self.cause.as_str(),
            self.notes.as_str(),
            self.balance.as_str(),
            self.dollars.as_str(),
            self.dollar_balance.as_str(),
        ]
    }
}
