use thiserror::Error;

/// Result type for rewriter operations
pub type Result<T> = std::result::Result<T, RewriteError>;

/// Errors that can occur while planning or applying markers
#[derive(Error, Debug)]
pub enum RewriteError {
    /// Source file could not be parsed into a structure view
    #[error("Source parse error: {0}")]
    SourceParse(String),

    /// No declaration in the file matches the record's type name
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// Tree-sitter grammar error
    #[error("Grammar error: {0}")]
    Grammar(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RewriteError {
    /// Create a source parse error
    pub fn source_parse(msg: impl Into<String>) -> Self {
        Self::SourceParse(msg.into())
    }

    /// Create a grammar error
    pub fn grammar(msg: impl Into<String>) -> Self {
        Self::Grammar(msg.into())
    }
}
