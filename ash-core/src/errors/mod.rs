mod nlp_error;

pub use nlp_error::NlpError;

/// Errors surfaced by the engine's fallible operations.
#[derive(Debug, thiserror::Error)]
pub enum AshError {
    #[error("keyword discovery is disabled")]
    DiscoveryDisabled,

    #[error("quota exceeded: {counter} usage {used}/{limit}")]
    QuotaExceeded {
        counter: String,
        used: u32,
        limit: u32,
    },

    #[error("confidence {confidence:.2} below threshold {threshold:.2}")]
    BelowThreshold { confidence: f64, threshold: f64 },

    #[error("invalid value for {field}: {reason}")]
    ValidationError { field: String, reason: String },

    #[error("keyword not found: {keyword}")]
    NotFound { keyword: String },

    #[error("upstream {operation} timed out after {timeout_ms} ms")]
    UpstreamTimeout { operation: String, timeout_ms: u64 },

    #[error("upstream {operation} failed: {reason}")]
    UpstreamError { operation: String, reason: String },

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl AshError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<NlpError> for AshError {
    fn from(err: NlpError) -> Self {
        match err {
            NlpError::Timeout {
                operation,
                timeout_ms,
            } => Self::UpstreamTimeout {
                operation,
                timeout_ms,
            },
            NlpError::Malformed { operation, reason }
            | NlpError::Unavailable { operation, reason } => {
                Self::UpstreamError { operation, reason }
            }
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type AshResult<T> = Result<T, AshError>;
