//! Profile registry port: per-provider parsing rules and metrics extraction
//! configuration. The core reads this registry; it never writes to it.

use std::collections::HashMap;

/// Suffix-matchable endpoint routes for a provider. Any non-empty field
/// represents a path the Path Inspector should match against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParsingRules {
    pub chat_completions_path: Option<String>,
    pub completions_path: Option<String>,
    pub generate_path: Option<String>,
}

impl RequestParsingRules {
    /// All configured (non-empty) path rules, in a stable order.
    pub fn paths(&self) -> Vec<&str> {
        [
            &self.chat_completions_path,
            &self.completions_path,
            &self.generate_path,
        ]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .filter(|p| !p.is_empty())
        .collect()
    }
}

/// Where metrics extraction should look for provider-reported numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsSource {
    ResponseBody,
    ResponseHeaders,
}

/// A provider's metrics-extraction profile: JSONPath locators, derived
/// calculations, and (currently unmapped) header sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsExtractionConfig {
    pub enabled: bool,
    pub source: MetricsSource,
    pub paths: HashMap<String, String>,
    pub calculations: HashMap<String, String>,
    pub headers: HashMap<String, String>,
}

impl Default for MetricsExtractionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            source: MetricsSource::ResponseBody,
            paths: HashMap::new(),
            calculations: HashMap::new(),
            headers: HashMap::new(),
        }
    }
}

/// A single provider profile as held by the registry.
#[derive(Debug, Clone, Default)]
pub struct ProviderProfile {
    pub name: String,
    pub request_parsing_rules: RequestParsingRules,
    pub metrics_extraction: MetricsExtractionConfig,
}

pub trait ProfileRegistry: Send + Sync {
    fn available_profiles(&self) -> Vec<String>;

    fn profile(&self, name: &str) -> Option<ProviderProfile>;
}
