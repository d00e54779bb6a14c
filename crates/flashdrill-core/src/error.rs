//! Collaborator error types.
//!
//! Defined in `flashdrill-core` so the engine and the adapters share one
//! vocabulary. None of these is fatal to a session: store failures are logged
//! and dropped, voice failures become a status message.

use thiserror::Error;

/// Failures from a [`PersistenceStore`](crate::traits::PersistenceStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but could not be decoded.
    #[error("corrupt store data: {0}")]
    Corrupt(String),

    /// The stored value has the wrong shape for its key.
    #[error("unexpected value for key '{key}'")]
    TypeMismatch { key: String },
}

/// Failures from a [`VoiceInput`](crate::traits::VoiceInput).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    /// Speech recognition permission was not granted.
    #[error("speech recognition not authorized")]
    NotAuthorized,

    /// A listening session is already in progress.
    #[error("already listening")]
    AlreadyListening,

    /// The final transcript held no number.
    #[error("no valid number found in '{0}'")]
    NoNumber(String),

    /// The recognizer reported an error.
    #[error("recognition error: {0}")]
    Recognition(String),
}

impl VoiceError {
    /// Returns `true` if retrying the same listening session could help.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, VoiceError::NotAuthorized)
    }
}

/// Misuse of the engine API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Deck length must be between 1 and the cap.
    #[error("deck size must be between 1 and {max}, got {got}")]
    InvalidDeckSize { got: usize, max: usize },

    /// A tick interval of zero would never advance timers.
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
}
