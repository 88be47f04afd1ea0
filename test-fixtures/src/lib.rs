//! Test fixture loader and scripted collaborators for the Ash workspace.
//!
//! Provides typed deserialization of the golden JSON files plus in-process
//! stand-ins for the NLP service, the keyword store, and the clock.

pub mod clock;
pub mod keywords;
pub mod nlp;

pub use clock::ManualClock;
pub use keywords::StaticKeywords;
pub use nlp::{candidate, ScriptedNlp};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

use ash_core::CrisisLevel;

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    if path.ends_with("test-fixtures") {
        return path;
    }
    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// One labelled message from the context-filter golden sets.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextCase {
    pub text: String,
    pub expected_level: CrisisLevel,
    #[serde(default)]
    pub note: String,
}

/// Messages that contain crisis phrases but are not crises.
pub fn context_false_positives() -> Vec<ContextCase> {
    load_fixture("golden/context/false_positives.json")
}

/// Messages that must keep their crisis level through the context filter.
pub fn context_true_crises() -> Vec<ContextCase> {
    load_fixture("golden/context/true_crises.json")
}
