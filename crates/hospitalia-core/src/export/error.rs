use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode sheet: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid sheet name: {0:?}")]
    InvalidSheetName(String),
}
