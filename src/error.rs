//! Error types for the farmplan crate.

/// Top-level error type for the planning system.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Task store error (open, read, or write).
    #[error("store error: {0}")]
    Store(String),

    /// Configuration error (load, parse, or save).
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::tasks::TaskStoreError> for PlanError {
    fn from(e: crate::tasks::TaskStoreError) -> Self {
        Self::Store(e.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, PlanError>;
