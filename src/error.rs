//! Error types for session boundaries
//!
//! The simulation tick never fails; these cover starting sessions and talking
//! to external collaborators (play limits, score submission, settings files).

/// Errors raised outside the tick loop
#[derive(thiserror::Error, Debug)]
pub enum BarrageError {
    /// Daily play limit exhausted and no play permission granted
    #[error("Play limit reached ({current}/{limit})")]
    PlayLimitReached { current: u32, limit: u32 },

    /// Operation not valid in the current lifecycle state
    #[error("Invalid lifecycle transition: {0}")]
    InvalidTransition(String),

    /// No key configured for signing score submissions
    #[error("Score signing key is not configured")]
    MissingSigningKey,

    /// Signature did not match the payload
    #[error("Score signature mismatch")]
    SignatureMismatch,

    /// Submission timestamp too far from the verifier's clock
    #[error("Submission timestamp is {age_ms}ms from the verifier clock")]
    StaleSubmission { age_ms: u64 },

    /// External collaborator (score store, play-limit service) failed
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// IO error from settings or leaderboard files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, BarrageError>;
