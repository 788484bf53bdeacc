use std::path::{Path, PathBuf};

use csv::Writer;
use serde::Serialize;
use tracing::{debug, info};

use super::{ExportError, SpreadsheetWriter};

/// Writes each sheet as `<dir>/<workbook>_<sheet>.csv`.
#[derive(Debug, Clone)]
pub struct CsvSheetWriter {
    dir: PathBuf,
    workbook: String,
}

impl CsvSheetWriter {
    pub fn new(dir: impl Into<PathBuf>, workbook: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            workbook: workbook.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File the given sheet is written to.
    pub fn sheet_path(&self, sheet_name: &str) -> Result<PathBuf, ExportError> {
        let sheet = file_component(sheet_name)
            .ok_or_else(|| ExportError::InvalidSheetName(sheet_name.to_string()))?;
        let workbook = file_component(&self.workbook)
            .ok_or_else(|| ExportError::InvalidSheetName(self.workbook.clone()))?;
        Ok(self.dir.join(format!("{}_{}.csv", workbook, sheet)))
    }
}

impl SpreadsheetWriter for CsvSheetWriter {
    fn write_sheet<R: Serialize>(
        &self,
        sheet_name: &str,
        records: &[R],
    ) -> Result<PathBuf, ExportError> {
        let path = self.sheet_path(sheet_name)?;
        let contents = render_csv(records)?;

        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, contents)?;

        info!(path = %path.display(), rows = records.len(), sheet = sheet_name, "Sheet exported");
        Ok(path)
    }
}

/// Encode records as CSV. The header row is taken from the first record's
/// field names.
pub fn render_csv<R: Serialize>(records: &[R]) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::from_writer(vec![]);
    for record in records {
        writer.serialize(record)?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    debug!(bytes = data.len(), "Encoded sheet");
    Ok(data)
}

/// Make a name safe to use inside a file name. Returns None if nothing
/// usable is left.
fn file_component(name: &str) -> Option<String> {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | ' ' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
