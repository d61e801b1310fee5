//! The enriched, typed description of an inbound request produced by the
//! inspector chain.

use std::collections::HashSet;

use dashmap::DashMap;
use serde_json::Value;

use crate::capabilities::ModelCapabilities;

/// Key inspectors use to record that a path rule matched; read by callers
/// who need to know whether path matching contributed to `supported_by`.
pub const PATH_SUPPORT_KEY: &str = "pathSupport";

/// Built once per request, handed off once routing completes. Treated as
/// read-mostly after the chain returns: `supported_by` is stable, and
/// `inspection_meta` supports concurrent reads via its internal sharding.
#[derive(Debug)]
pub struct RequestProfile {
    path: String,
    model_name: String,
    supported_by: HashSet<String>,
    model_capabilities: Option<ModelCapabilities>,
    inspection_meta: DashMap<String, Value>,
}

impl RequestProfile {
    /// Construct a fresh profile for `path`; everything else starts empty.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            model_name: String::new(),
            supported_by: HashSet::new(),
            model_capabilities: None,
            inspection_meta: DashMap::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Overwrite the model name. Callers are expected to pass an already
    /// normalized (trimmed, lowercased) value.
    pub fn set_model_name(&mut self, model_name: impl Into<String>) {
        self.model_name = model_name.into();
    }

    pub fn supported_by(&self) -> &HashSet<String> {
        &self.supported_by
    }

    /// Merge `profiles` into the supported-by set; duplicates are
    /// suppressed by `HashSet`'s own semantics.
    pub fn extend_supported_by<I: IntoIterator<Item = String>>(&mut self, profiles: I) {
        self.supported_by.extend(profiles);
    }

    pub fn model_capabilities(&self) -> Option<&ModelCapabilities> {
        self.model_capabilities.as_ref()
    }

    /// Attach capabilities only when they are notable (spec §4.3); a
    /// non-notable record is discarded rather than stored.
    pub fn set_model_capabilities(&mut self, capabilities: ModelCapabilities) {
        if capabilities.is_notable() {
            self.model_capabilities = Some(capabilities);
        }
    }

    pub fn meta_get(&self, key: &str) -> Option<Value> {
        self.inspection_meta.get(key).map(|v| v.clone())
    }

    pub fn meta_insert(&self, key: impl Into<String>, value: Value) {
        self.inspection_meta.insert(key.into(), value);
    }

    pub fn meta_contains(&self, key: &str) -> bool {
        self.inspection_meta.contains_key(key)
    }
}
