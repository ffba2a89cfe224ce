//! Error types for the core crate.

use thiserror::Error;

/// Errors reported by collaborators of the dispatcher.
///
/// None of these ever reach a chat user: the dispatcher logs them and carries
/// on silently.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The chat transport failed (network error, bot blocked, chat not found).
    #[error("transport error: {0}")]
    Transport(String),

    /// The prize service could not be reached or rejected the request.
    #[error("prize service error: {0}")]
    Prize(String),

    /// Saving or loading the admin list failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] dicebot_persistence::PersistenceError),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
