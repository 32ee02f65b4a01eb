use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the BI assistant.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A spreadsheet workbook could not be opened or has no usable sheet.
    #[error("Failed to read spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// A CSV file could not be parsed.
    #[error("Failed to read CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// The data file extension is not one the loader understands.
    #[error("Unsupported data file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The expected data file does not exist.
    #[error("Data file not found: {0}")]
    DataPathNotFound(PathBuf),

    /// An aggregation needs a column that the loaded dataset does not have.
    #[error("Column \"{0}\" is missing from the dataset")]
    MissingColumn(String),

    /// An aggregation has no rows to reduce.
    #[error("No data available to compute {0}")]
    EmptyDataset(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the assistant crates.
pub type Result<T> = std::result::Result<T, AssistantError>;
