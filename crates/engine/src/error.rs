use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while driving the conversion pipeline
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid configuration; fatal before any file is processed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Snapshot of a file before mutation failed
    #[error("Backup error: {0}")]
    Backup(String),

    /// Writing a rewritten file failed (after backup, before restore)
    #[error("Write error for {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Descriptor extraction failed
    #[error(transparent)]
    Wiring(#[from] rewire_wiring::WiringError),

    /// Source planning/rewriting failed
    #[error(transparent)]
    Rewrite(#[from] rewire_rewriter::RewriteError),
}

impl EngineError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a backup error
    pub fn backup(msg: impl Into<String>) -> Self {
        Self::Backup(msg.into())
    }
}
