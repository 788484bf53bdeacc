//! Spreadsheet export of the ledger table.
//!
//! The ledger hands over uniform records; a [`SpreadsheetWriter`] turns them
//! into one downloadable document holding one named sheet. Header row and
//! column order come from the record type's field order.

pub mod csv_writer;
pub mod error;

use std::path::PathBuf;

use serde::Serialize;

pub use csv_writer::{render_csv, CsvSheetWriter};
pub use error::ExportError;

/// Default document name, without extension.
pub const DEFAULT_WORKBOOK_NAME: &str = "HospitaliaGB";

/// Default sheet name.
pub const DEFAULT_SHEET_NAME: &str = "Datos";

/// Writes a sequence of records as a single named sheet.
pub trait SpreadsheetWriter {
    /// Write the records and return where the document ended up.
    fn write_sheet<R: Serialize>(
        &self,
        sheet_name: &str,
        records: &[R],
    ) -> Result<PathBuf, ExportError>;
}
