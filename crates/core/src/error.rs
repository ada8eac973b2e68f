use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanopyError {
    /// Malformed node identity or failed coordinator invariant checks.
    /// Carries every violation found, not just the first.
    #[error("validation failed: {}", violations.join("; "))]
    Validation { violations: Vec<String> },
    /// Normalization recursion guard tripped: either a pathological raw
    /// tree or a misconfigured depth limit.
    #[error("normalization depth {depth} exceeds configured maximum {max}")]
    DepthExceeded { depth: u32, max: u32 },
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl CanopyError {
    pub fn validation(message: impl Into<String>) -> Self {
        CanopyError::Validation {
            violations: vec![message.into()],
        }
    }
}

pub type Result<T> = std::result::Result<T, CanopyError>;
