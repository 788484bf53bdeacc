//! Application state for the Hospitalia ledger form.
//!
//! The `App` struct owns the form fields, the session ledger and the UI
//! state. Every transition (typing, submit, clear, export) runs to
//! completion inside one key event.

use std::path::PathBuf;

use hospitalia_core::export::{CsvSheetWriter, ExportError, SpreadsheetWriter};
use hospitalia_core::ledger::{FormField, FormInput, Ledger, LedgerAction, LedgerEffect};
use hospitalia_core::Config;
use tracing::{error, info};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length of any form field.
const MAX_FIELD_LENGTH: usize = 64;

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

pub struct App {
    pub state: AppState,
    pub form: FormInput,
    pub focus: FormField,
    pub ledger: Ledger,
    /// First visible table row
    pub table_scroll: usize,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    sheet_name: String,
    writer: CsvSheetWriter,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            state: AppState::Normal,
            form: FormInput::default(),
            focus: FormField::Date,
            ledger: Ledger::new(config.prior_balance_mode, config.ledger_format()),
            table_scroll: 0,
            status_message: None,
            status_is_error: false,
            sheet_name: config.sheet_name.clone(),
            writer: CsvSheetWriter::new(config.export_dir(), config.workbook_name.clone()),
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    // ===== Form editing =====

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.form.get_mut(self.focus);
        if can_add_field_char(field.chars().count(), c) {
            field.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.form.get_mut(self.focus).pop();
    }

    // ===== Ledger transitions =====

    /// Submit the form: the ledger gets a snapshot and the form is reset.
    pub fn submit(&mut self) {
        let input = std::mem::take(&mut self.form);
        let coerced: Vec<&str> = input.invalid_fields().iter().map(|f| f.label()).collect();

        let (ledger, effect) = std::mem::take(&mut self.ledger).apply(LedgerAction::Submit(input));
        self.ledger = ledger;
        self.focus = FormField::Date;
        self.scroll_to_end();

        if let LedgerEffect::Appended { row, .. } = effect {
            if coerced.is_empty() {
                self.set_status(format!("Entry added. Balance: {}", row.balance));
            } else {
                self.set_error(format!(
                    "Entry added; not a number, counted as 0: {}",
                    coerced.join(", ")
                ));
            }
        }
    }

    /// Drop every row and reset the totals. No confirmation.
    pub fn clear_table(&mut self) {
        let (ledger, _) = std::mem::take(&mut self.ledger).apply(LedgerAction::Clear);
        self.ledger = ledger;
        self.table_scroll = 0;
        self.set_status("Table cleared");
    }

    /// Write the table plus its totals row as a spreadsheet.
    pub fn export(&mut self) -> Result<PathBuf, ExportError> {
        let sheet = self.ledger.export();
        self.writer.write_sheet(&self.sheet_name, &sheet.rows)
    }

    /// Export and report the outcome in the status bar.
    pub fn export_with_status(&mut self) {
        if self.ledger.is_empty() {
            self.set_error("Nothing to export yet");
            return;
        }
        match self.export() {
            Ok(path) => {
                info!(path = %path.display(), "Exported ledger");
                self.set_status(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                error!(error = %e, "Export failed");
                self.set_error(format!("Export failed: {}", e));
            }
        }
    }

    // ===== Table scrolling =====

    pub fn scroll_up(&mut self, amount: usize) {
        self.table_scroll = self.table_scroll.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        let max = self.ledger.rows().len().saturating_sub(1);
        self.table_scroll = (self.table_scroll + amount).min(max);
    }

    fn scroll_to_end(&mut self) {
        self.table_scroll = self.ledger.rows().len().saturating_sub(PAGE_SCROLL_SIZE);
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a form field character should be accepted
pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(tag: &str) -> Config {
        Config {
            export_dir: Some(std::env::temp_dir().join(format!(
                "hospitalia-tui-{}-{}",
                tag,
                std::process::id()
            ))),
            ..Config::default()
        }
    }

    fn type_text(app: &mut App, field: FormField, text: &str) {
        app.focus = field;
        for c in text.chars() {
            app.push_char(c);
        }
    }

    #[test]
    fn test_submit_resets_form() {
        let mut app = App::new(&test_config("submit"));
        type_text(&mut app, FormField::Date, "2024-01-01");
        type_text(&mut app, FormField::Income, "1000");
        type_text(&mut app, FormField::Expense, "200");
        type_text(&mut app, FormField::PriorBalance, "50");
        type_text(&mut app, FormField::Dollars, "10");

        app.submit();

        assert!(app.form.is_empty());
        assert_eq!(app.focus, FormField::Date);
        assert_eq!(app.ledger.rows().len(), 1);
        assert_eq!(app.ledger.totals().balance(), 850.0);
        assert!(!app.status_is_error);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Entry added. Balance: $\u{a0}850,00")
        );
    }

    #[test]
    fn test_submit_warns_on_coerced_fields() {
        let mut app = App::new(&test_config("coerced"));
        type_text(&mut app, FormField::Income, "mil");
        app.submit();

        assert_eq!(app.ledger.rows().len(), 1);
        assert!(app.ledger.totals().is_zero());
        assert!(app.status_is_error);
        assert!(app.status_message.as_deref().unwrap_or("").contains("Ingresos"));
    }

    #[test]
    fn test_clear_table() {
        let mut app = App::new(&test_config("clear"));
        type_text(&mut app, FormField::Income, "5");
        app.submit();
        app.clear_table();
        assert!(app.ledger.is_empty());
        assert!(app.ledger.totals().is_zero());
        assert_eq!(app.table_scroll, 0);
    }

    #[test]
    fn test_export_writes_rows_plus_totals() {
        let config = test_config("export");
        let mut app = App::new(&config);
        type_text(&mut app, FormField::Income, "100");
        app.submit();
        type_text(&mut app, FormField::Expense, "30");
        app.submit();

        let path = app.export().unwrap();
        assert_eq!(path.file_name().unwrap(), "HospitaliaGB_Datos.csv");
        let text = std::fs::read_to_string(&path).unwrap();
        // Header + 2 rows + totals
        assert_eq!(text.lines().count(), 4);
        assert_eq!(app.ledger.rows().len(), 2);

        let _ = std::fs::remove_dir_all(config.export_dir());
    }

    #[test]
    fn test_export_with_nothing_entered() {
        let mut app = App::new(&test_config("empty"));
        app.export_with_status();
        assert!(app.status_is_error);
    }

    #[test]
    fn test_field_length_limit() {
        let mut app = App::new(&test_config("limit"));
        type_text(&mut app, FormField::Notes, &"x".repeat(100));
        assert_eq!(app.form.notes.len(), MAX_FIELD_LENGTH);
        app.pop_char();
        assert_eq!(app.form.notes.len(), MAX_FIELD_LENGTH - 1);
    }

    #[test]
    fn test_can_add_field_char() {
        assert!(can_add_field_char(0, 'a'));
        assert!(can_add_field_char(63, 'ó'));
        assert!(!can_add_field_char(64, 'a'));
        assert!(!can_add_field_char(0, '\n'));
        assert!(!can_add_field_char(0, '\t'));
    }

    #[test]
    fn test_scrolling() {
        let mut app = App::new(&test_config("scroll"));
        for _ in 0..25 {
            type_text(&mut app, FormField::Income, "1");
            app.submit();
        }
        assert_eq!(app.table_scroll, 15);
        app.scroll_down(PAGE_SCROLL_SIZE);
        assert_eq!(app.table_scroll, 24);
        app.scroll_up(100);
        assert_eq!(app.table_scroll, 0);
    }
}
