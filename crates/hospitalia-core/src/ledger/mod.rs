//! Session ledger: form input, running totals and the rendered rows.
//!
//! Each submission is folded into [`RunningTotals`] and snapshotted as a
//! [`LedgerRow`] of display strings. Rows are append-only and live for
//! the session; [`Ledger::clear`] is the only way to drop them.
//!
//! Numeric fields never fail to parse: blank or unreadable text counts as
//! zero. [`AmountInput`] keeps the distinction for front-ends that want to
//! warn about it.

pub mod accumulator;
pub mod form;
pub mod row;
pub mod totals;

pub use accumulator::{ExportSheet, Ledger, LedgerAction, LedgerEffect};
pub use form::{parse_amount, AmountInput, FormField, FormInput};
pub use row::{LedgerFormat, LedgerRow, TOTALS_LABEL};
pub use totals::{Contribution, PriorBalanceMode, RunningTotals};
