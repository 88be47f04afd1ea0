//! DiscoveryPipeline: asserted miss → extracted candidates → pending suggestions.

use std::sync::Arc;
use std::time::Duration;

use ash_core::config::EngineConfig;
use ash_core::models::{KeywordCandidate, KeywordSuggestion};
use ash_core::traits::IKeywordExtractor;
use ash_core::{AshError, AshResult, Clock, CrisisLevel, NlpError};
use ash_quota::{QuotaCounter, QuotaManager, QuotaStatus};
use tracing::debug;

use crate::store::{SuggestionStore, UpsertOutcome};

const EXTRACT_OPERATION: &str = "extract_keyword_candidates";

/// A reviewer's claim that `text` should have triggered `asserted_level`.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryRequest {
    pub text: String,
    pub asserted_level: CrisisLevel,
    pub reporter_id: String,
    pub channel_id: Option<String>,
}

impl DiscoveryRequest {
    pub fn new(
        text: impl Into<String>,
        asserted_level: CrisisLevel,
        reporter_id: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            asserted_level,
            reporter_id: reporter_id.into(),
            channel_id: None,
        }
    }

    pub fn in_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    /// Provenance recorded on the suggestion: `reporter@channel`.
    pub fn source(&self) -> String {
        match &self.channel_id {
            Some(channel) => format!("{}@{}", self.reporter_id, channel),
            None => self.reporter_id.clone(),
        }
    }

    fn validate(&self) -> AshResult<()> {
        if self.text.trim().is_empty() {
            return Err(AshError::validation("text", "message text is empty"));
        }
        if self.asserted_level == CrisisLevel::None {
            return Err(AshError::validation(
                "asserted_level",
                "a discovery must assert a crisis level above none",
            ));
        }
        if self.reporter_id.trim().is_empty() {
            return Err(AshError::validation("reporter_id", "reporter id is empty"));
        }
        Ok(())
    }
}

pub struct DiscoveryPipeline<E> {
    extractor: Arc<E>,
    store: Arc<SuggestionStore>,
    quota: Arc<QuotaManager>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl<E: IKeywordExtractor> DiscoveryPipeline<E> {
    pub fn new(
        extractor: Arc<E>,
        store: Arc<SuggestionStore>,
        quota: Arc<QuotaManager>,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Self {
        Self {
            extractor,
            store,
            quota,
            clock,
            timeout,
        }
    }

    pub fn store(&self) -> &Arc<SuggestionStore> {
        &self.store
    }

    /// Run one discovery under `config`.
    ///
    /// Returns the merged and newly created suggestions, one per keyword.
    /// New keywords each take one unit of the daily discovery quota; when the
    /// quota runs out mid-batch the rest are skipped, and the call fails with
    /// `QuotaExceeded` only if nothing was admitted or merged.
    pub async fn discover(
        &self,
        request: &DiscoveryRequest,
        config: &EngineConfig,
    ) -> AshResult<Vec<KeywordSuggestion>> {
        if !config.discovery_enabled {
            return Err(AshError::DiscoveryDisabled);
        }
        request.validate()?;
        if self.quota.status(QuotaCounter::Discoveries) == QuotaStatus::Exhausted {
            return Err(self.quota.exceeded(QuotaCounter::Discoveries));
        }

        let candidates = self.extract(&request.text, request.asserted_level).await?;
        let source = request.source();
        let now = self.clock.now();

        let mut results: Vec<KeywordSuggestion> = Vec::new();
        let mut rejected = 0usize;
        for candidate in candidates {
            if !is_well_formed(&candidate) {
                debug!(
                    keyword = %candidate.keyword,
                    confidence = candidate.confidence,
                    "dropping malformed candidate"
                );
                continue;
            }
            if candidate.confidence < config.min_confidence {
                debug!(
                    keyword = %candidate.keyword,
                    confidence = candidate.confidence,
                    min_confidence = config.min_confidence,
                    "candidate below min confidence"
                );
                continue;
            }
            let suggestion = KeywordSuggestion::new(
                &candidate.keyword,
                candidate.crisis_level,
                candidate.confidence,
                source.clone(),
                candidate.reasoning,
                Some(&request.text),
                now,
            );
            let stored = match self
                .store
                .upsert(suggestion, || self.quota.try_reserve(QuotaCounter::Discoveries))
            {
                UpsertOutcome::Inserted(s) | UpsertOutcome::Merged(s) => s,
                UpsertOutcome::Rejected => {
                    rejected += 1;
                    continue;
                }
            };
            match results.iter_mut().find(|s| s.keyword == stored.keyword) {
                Some(existing) => *existing = stored,
                None => results.push(stored),
            }
        }

        if results.is_empty() && rejected > 0 {
            return Err(self.quota.exceeded(QuotaCounter::Discoveries));
        }
        if rejected > 0 {
            debug!(skipped = rejected, admitted = results.len(), "quota ran out mid-batch");
        }
        Ok(results)
    }

    async fn extract(&self, text: &str, level: CrisisLevel) -> AshResult<Vec<KeywordCandidate>> {
        match tokio::time::timeout(
            self.timeout,
            self.extractor.extract_keyword_candidates(text, level),
        )
        .await
        {
            Err(_elapsed) => Err(NlpError::Timeout {
                operation: EXTRACT_OPERATION.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
            .into()),
            Ok(result) => Ok(result?),
        }
    }
}

fn is_well_formed(candidate: &KeywordCandidate) -> bool {
    !candidate.keyword.trim().is_empty()
        && candidate.confidence.is_finite()
        && (0.0..=1.0).contains(&candidate.confidence)
        && candidate.crisis_level != CrisisLevel::None
}
