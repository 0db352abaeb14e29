//! Error types for Nudge

/// Result type alias using Nudge's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Nudge operations
///
/// None of these ever reach a prediction request: the trainer's caller turns
/// them into a logged diagnostic and keeps serving the previous model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Corpus is unreadable or lacks the required columns
    #[error("corpus error: {0}")]
    Corpus(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Another training pass holds the model
    #[error("training already in progress")]
    TrainingInProgress,

    /// Filesystem/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new corpus error
    pub fn corpus(msg: impl Into<String>) -> Self {
        Self::Corpus(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
