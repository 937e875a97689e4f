use std::path::Path;
use thiserror::Error;

/// Result type for wiring extraction
pub type Result<T> = std::result::Result<T, WiringError>;

/// Errors that can occur while extracting wiring records
#[derive(Error, Debug)]
pub enum WiringError {
    /// Descriptor is not well-formed markup
    #[error("Markup parse error in {path}: {message}")]
    MarkupParse { path: String, message: String },

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WiringError {
    /// Create a markup parse error for a descriptor file
    pub fn markup_parse(path: &Path, message: impl ToString) -> Self {
        Self::MarkupParse {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}
