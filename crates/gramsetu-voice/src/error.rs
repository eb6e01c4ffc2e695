//! Error types for the GramSetu voice session

use gramsetu_intent::ClassifierError;
use thiserror::Error;

/// Result type alias for controller operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type alias for setup (configuration, rule loading)
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Failures reported by the speech capture collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("speech capture is not supported on this device")]
    Unsupported,

    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("speech capture failed: {0}")]
    Failed(String),
}

impl CaptureError {
    /// Capability errors put the controller in `Error`; anything else returns it to `Idle`.
    pub fn is_capability_error(&self) -> bool {
        matches!(self, CaptureError::Unsupported | CaptureError::PermissionDenied)
    }
}

/// Errors surfaced to the host by the session controller. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("a capture session is already listening")]
    AlreadyListening,

    #[error("no capture session is listening")]
    NotListening,

    #[error("vocabulary and dispatch mode cannot change mid-turn")]
    ContextLocked,
}

/// Errors building a controller from configuration
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Rule table error: {0}")]
    Rules(#[from] ClassifierError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
