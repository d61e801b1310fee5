//! Path Inspector: maps a request path to the set of provider profiles that
//! can potentially serve it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use relay_types::ports::ProfileRegistry;
use relay_types::profile::PATH_SUPPORT_KEY;
use relay_types::RequestProfile;

use super::{Inspector, InspectableRequest};

const OPENAI_COMPATIBLE_PROFILE: &str = "openai";

/// Built once at construction from the profile registry's path rules, then
/// treated as immutable. Exact-match lookups hit the map directly; a miss
/// falls back to a suffix scan so the proxy can sit under an arbitrary path
/// prefix.
pub struct PathInspector {
    index: HashMap<String, Vec<String>>,
}

impl PathInspector {
    /// Build the eager path index from every profile's parsing rules. A nil
    /// (absent) registry still constructs a working, empty-index inspector
    /// — inspection becomes a logged no-op rather than an error.
    pub fn new(registry: Option<&dyn ProfileRegistry>) -> Self {
        let mut index: HashMap<String, Vec<String>> = HashMap::new();

        if let Some(registry) = registry {
            for name in registry.available_profiles() {
                let Some(profile) = registry.profile(&name) else {
                    continue;
                };
                for path in profile.request_parsing_rules.paths() {
                    index.entry(path.to_string()).or_default().push(name.clone());
                }
            }
        } else {
            tracing::debug!("path inspector constructed with no profile registry; inspection is a no-op");
        }

        Self { index }
    }

    fn matching_profiles(&self, request_path: &str) -> Vec<String> {
        if let Some(profiles) = self.index.get(request_path) {
            return profiles.clone();
        }

        let mut matched = Vec::new();
        for (key, profiles) in &self.index {
            if request_path.ends_with(key.as_str()) {
                matched.extend(profiles.iter().cloned());
            }
        }
        matched
    }
}

#[async_trait]
impl Inspector for PathInspector {
    async fn inspect(&self, _request: &dyn InspectableRequest, profile: &mut RequestProfile) {
        if profile.path().is_empty() {
            return;
        }

        let matched = self.matching_profiles(profile.path());
        if matched.is_empty() {
            return;
        }

        profile.extend_supported_by(matched);
        profile.meta_insert(PATH_SUPPORT_KEY, serde_json::Value::Bool(true));
    }

    fn name(&self) -> &str {
        "path"
    }
}

/// Build a [`PathInspector`] from an `Arc<dyn ProfileRegistry>`, the shape
/// most callers actually hold.
pub fn path_inspector_from_registry(registry: Option<Arc<dyn ProfileRegistry>>) -> PathInspector {
    PathInspector::new(registry.as_deref())
}
