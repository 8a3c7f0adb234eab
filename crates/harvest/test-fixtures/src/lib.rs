//! Shared test doubles and fixture loading for the Harvest workspace.
//!
//! Scripted advisors and sources let tests control timing and failure of
//! each collaborator; `load_fixture` reads JSON scenarios from `data/`.

pub mod advisors;
pub mod context;
pub mod policies;
pub mod resolver;
pub mod scenario;
pub mod sources;

use std::path::PathBuf;

use serde::de::DeserializeOwned;

pub use advisors::{result_with, ScriptedAdvisor};
pub use context::{
    context_without, full_context, request, sample_history, sample_preferences, sample_soil,
    sample_weather,
};
pub use policies::{policy_with, proceed_everywhere};
pub use resolver::FixedResolver;
pub use scenario::{Expectation, Scenario, ScenarioAdvisor, ScenarioOutcome};
pub use sources::{FailingSource, SlowSource, StaticSource, ToggleSource};

/// Root of this crate's `data/` directory.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file relative to `data/`.
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

/// List all JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    paths.sort();
    paths
}
