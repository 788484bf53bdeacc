use tracing::{debug, info, warn};

use super::form::FormInput;
use super::row::{LedgerFormat, LedgerRow};
use super::totals::{Contribution, PriorBalanceMode, RunningTotals};

/// Tagged state transitions on a [`Ledger`].
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerAction {
    Submit(FormInput),
    Clear,
    Export,
}

/// What a transition produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEffect {
    Appended { row: LedgerRow, totals: RunningTotals },
    Cleared,
    Export(ExportSheet),
}

/// Entered rows followed by exactly one totals row, ready to hand to a
/// spreadsheet writer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSheet {
    pub rows: Vec<LedgerRow>,
}

impl ExportSheet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn totals_row(&self) -> Option<&LedgerRow> {
        self.rows.last()
    }
}

/// Session ledger: the append-only row sequence plus the running totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    rows: Vec<LedgerRow>,
    totals: RunningTotals,
    mode: PriorBalanceMode,
    format: LedgerFormat,
}

impl Ledger {
    pub fn new(mode: PriorBalanceMode, format: LedgerFormat) -> Self {
        Self {
            rows: Vec::new(),
            totals: RunningTotals::default(),
            mode,
            format,
        }
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn totals(&self) -> RunningTotals {
        self.totals
    }

    pub fn mode(&self) -> PriorBalanceMode {
        self.mode
    }

    pub fn format(&self) -> &LedgerFormat {
        &self.format
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record one form submission. Never fails: numeric fields that cannot
    /// be parsed count as zero.
    pub fn submit(&mut self, input: FormInput) -> (LedgerRow, RunningTotals) {
        let invalid = input.invalid_fields();
        if !invalid.is_empty() {
            warn!(fields = ?invalid, "Numeric fields coerced to zero");
        }

        let contribution = Contribution::from_input(&input);
        self.totals.record(&contribution, self.mode);

        let row = LedgerRow::new(&input, &contribution, &self.totals, &self.format);
        self.rows.push(row.clone());

        debug!(
            rows = self.rows.len(),
            balance = self.totals.balance(),
            "Ledger entry recorded"
        );

        (row, self.totals)
    }

    /// Drop every row and reset the totals to zero.
    pub fn clear(&mut self) {
        info!(rows = self.rows.len(), "Clearing ledger");
        self.rows.clear();
        self.totals = RunningTotals::default();
    }

    /// Rows plus the synthesized totals row.
    pub fn export(&self) -> ExportSheet {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.extend(self.rows.iter().cloned());
        rows.push(LedgerRow::totals(&self.totals, &self.format));
        ExportSheet { rows }
    }

    /// Apply one tagged transition, consuming the current state.
    pub fn apply(mut self, action: LedgerAction) -> (Self, LedgerEffect) {
        let effect = match action {
            LedgerAction::Submit(input) => {
                let (row, totals) = self.submit(input);
                LedgerEffect::Appended { row, totals }
            }
            LedgerAction::Clear => {
                self.clear();
                LedgerEffect::Cleared
            }
            LedgerAction::Export => LedgerEffect::Export(self.export()),
        };
        (self, effect)
    }
}
