use std::future::Future;

use crate::errors::NlpError;
use crate::models::NlpVerdict;

/// NLP crisis classification (`InferCrisisSignal`).
pub trait ICrisisInference: Send + Sync {
    /// Classify one message. The engine applies its own timeout on top.
    fn infer_crisis_signal(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<NlpVerdict, NlpError>> + Send;
}
