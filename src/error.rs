//! Error handling for Scenecast
//!
//! Every error carries a stable code and user-facing recovery hints so the
//! notification layer can report it without knowing where it came from.

use thiserror::Error;

/// Result type alias for Scenecast operations
pub type Result<T> = std::result::Result<T, SceneError>;

/// Main error type for Scenecast operations
#[derive(Error, Debug)]
pub enum SceneError {
    // Submission Errors
    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("A generation request is already in flight")]
    DuplicateSubmission,

    #[error("No async runtime available to dispatch the request")]
    NoRuntime,

    // Service Errors
    #[error("Generation service error: {reason}")]
    Service { reason: String },

    #[error("Generation service unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    #[error("Generation service timed out after {timeout_ms}ms")]
    ServiceTimeout { timeout_ms: u64 },

    // Media Errors
    #[error("Could not open media at {url}: {reason}")]
    MediaOpen { url: String, reason: String },

    #[error("{channel} playback failed: {reason}")]
    MediaPlayback { channel: String, reason: String },

    #[error("No video available for download")]
    NoVideo,

    // Input Errors
    #[error("Invalid color '{input}': expected #rrggbb")]
    InvalidColor { input: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SceneError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SceneError::EmptyPrompt => "EMPTY_PROMPT",
            SceneError::DuplicateSubmission => "DUPLICATE_SUBMISSION",
            SceneError::NoRuntime => "NO_RUNTIME",
            SceneError::Service { .. } => "SERVICE_ERROR",
            SceneError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            SceneError::ServiceTimeout { .. } => "SERVICE_TIMEOUT",
            SceneError::MediaOpen { .. } => "MEDIA_OPEN",
            SceneError::MediaPlayback { .. } => "MEDIA_PLAYBACK",
            SceneError::NoVideo => "NO_VIDEO",
            SceneError::InvalidColor { .. } => "INVALID_COLOR",
            SceneError::Config { .. } => "CONFIG_ERROR",
            SceneError::Io(_) => "IO_ERROR",
            SceneError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the user can recover by retrying or editing input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SceneError::EmptyPrompt
                | SceneError::DuplicateSubmission
                | SceneError::Service { .. }
                | SceneError::ServiceUnavailable { .. }
                | SceneError::ServiceTimeout { .. }
                | SceneError::MediaPlayback { .. }
                | SceneError::InvalidColor { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            SceneError::EmptyPrompt => vec![
                "Describe the scene you want to animate",
                "Example: 'a cat dancing on the moon'",
            ],
            SceneError::DuplicateSubmission => {
                vec!["Wait for the current generation to finish"]
            }
            SceneError::Service { .. } => vec![
                "Submit the request again",
                "Try a shorter or simpler prompt",
            ],
            SceneError::ServiceUnavailable { .. } => vec![
                "Check that the generation bridge is running",
                "Set SCENECAST_SERVICE_URL to the bridge address",
                "Build with --features bridge for HTTP support",
            ],
            SceneError::ServiceTimeout { .. } => vec![
                "Submit the request again",
                "Raise SCENECAST_SERVICE_TIMEOUT_MS",
            ],
            SceneError::MediaPlayback { .. } => vec![
                "Press play again",
                "The other audio channel keeps playing",
            ],
            SceneError::InvalidColor { .. } => vec!["Use a six digit hex color such as #3b82f6"],
            _ => vec![],
        }
    }

    /// Get a user-friendly message for this error
    pub fn friendly_message(&self) -> String {
        match self {
            SceneError::EmptyPrompt => "Please enter a prompt first".to_string(),
            SceneError::DuplicateSubmission => {
                "An animation is already being generated".to_string()
            }
            SceneError::Service { .. }
            | SceneError::ServiceUnavailable { .. }
            | SceneError::ServiceTimeout { .. } => {
                format!("Failed to generate animation: {}", self)
            }
            SceneError::NoVideo => "No video available for download".to_string(),
            _ => self.to_string(),
        }
    }
}
