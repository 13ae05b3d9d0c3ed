use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur while the
/// tool loads its settings, talks to the Books API, or emits the workbook.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a response body is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the settings file is malformed or incomplete.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Transport-level HTTP failures (DNS, TLS, connection resets, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Raised when the server answers with a non-success status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Raised when the API answers with JSON that lacks an expected field.
    #[error("unexpected response for list '{list}': missing or invalid {path}")]
    Schema { list: String, path: String },

    /// Raised when a cover image cannot be fetched or embedded.
    #[error("cover image {url} could not be embedded: {reason}")]
    Image { url: String, reason: String },

    /// Raised when every list in the settings file is disabled.
    #[error("no bestseller lists are enabled in the configuration")]
    NoListsEnabled,

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when a workbook does not follow the layout this tool writes.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ToolError {
    pub(crate) fn schema(list: &str, path: impl Into<String>) -> Self {
        ToolError::Schema {
            list: list.to_string(),
            path: path.into(),
        }
    }
}
