//! Error types for table loading and session transitions.

use thiserror::Error;

/// Errors raised while reading an uploaded table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The CSV reader rejected the input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input has no header row.
    #[error("table has no header row")]
    MissingHeader,

    /// A data row has a different number of cells than the header.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The spreadsheet reader rejected the workbook.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// The workbook has no worksheet to read.
    #[error("workbook has no worksheets")]
    NoWorksheet,

    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised when an action does not fit the session's state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("interview has not been started")]
    NotStarted,

    #[error("interview is already complete")]
    Complete,

    /// Uploads are only accepted on the hands-on question.
    #[error("question {question_id} does not accept a file upload")]
    UploadNotAccepted { question_id: String },
}
