//! # ash-discovery
//!
//! Human-asserted misses go through the [`DiscoveryPipeline`]: extraction by
//! the NLP collaborator, confidence gating, then admission into the
//! [`SuggestionStore`] under the daily discovery quota.

pub mod pipeline;
pub mod store;

pub use pipeline::{DiscoveryPipeline, DiscoveryRequest};
pub use store::{ClearScope, SortOrder, SuggestionFilter, SuggestionStore, UpsertOutcome};
