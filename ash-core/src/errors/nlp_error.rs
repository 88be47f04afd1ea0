/// Failures of the external NLP collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NlpError {
    #[error("{operation} timed out after {timeout_ms} ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("{operation} returned malformed data: {reason}")]
    Malformed { operation: String, reason: String },

    #[error("{operation} unavailable: {reason}")]
    Unavailable { operation: String, reason: String },
}

impl NlpError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
