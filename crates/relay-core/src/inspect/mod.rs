//! Inspector chain: runs a configured, ordered sequence of enrichers over a
//! `(request, profile)` pair.

pub mod body;
pub mod path;

use std::sync::Arc;

use async_trait::async_trait;
use relay_types::RequestProfile;

pub use body::{BodyInspector, RequestBody};
pub use path::PathInspector;

/// An independent enricher of a [`RequestProfile`]. Inspectors never abort
/// the chain on error — a failure is logged by the inspector itself and the
/// next inspector still runs, since one inspector's trouble (malformed JSON
/// body, say) must not deprive the others of the information they produce.
#[async_trait]
pub trait Inspector: Send + Sync {
    async fn inspect(&self, request: &dyn InspectableRequest, profile: &mut RequestProfile);

    /// Name used in logs when an inspector's own error handling wants to
    /// identify itself.
    fn name(&self) -> &str;
}

/// What an inspector needs from the inbound request, independent of any
/// particular HTTP server framework.
pub trait InspectableRequest: Send + Sync {
    fn content_type(&self) -> Option<&str>;
    fn content_length(&self) -> Option<u64>;
    fn body(&self) -> Arc<dyn RequestBody>;

    /// Swap in a new body reader. [`body::BodyInspector`] calls this once it
    /// has drained and buffered a prefix, so downstream handlers still see
    /// the exact original byte sequence rather than an exhausted stream.
    fn replace_body(&self, body: Arc<dyn RequestBody>);
}

/// A configured, ordered sequence of inspectors. Order is significant and
/// stable: later inspectors observe every mutation earlier ones made.
pub struct InspectorChain {
    inspectors: Vec<Box<dyn Inspector>>,
}

impl InspectorChain {
    pub fn new() -> Self {
        Self { inspectors: Vec::new() }
    }

    /// Append to the tail of the chain.
    pub fn add_inspector(&mut self, inspector: Box<dyn Inspector>) {
        self.inspectors.push(inspector);
    }

    /// Construct a fresh profile for `target_path`, run every inspector in
    /// registration order, and return it. Never fails: inspector errors are
    /// the inspector's own concern, swallowed before they reach here.
    pub async fn inspect(&self, request: &dyn InspectableRequest, target_path: &str) -> RequestProfile {
        let mut profile = RequestProfile::new(target_path);
        for inspector in &self.inspectors {
            inspector.inspect(request, &mut profile).await;
        }
        profile
    }
}

impl Default for InspectorChain {
    fn default() -> Self {
        Self::new()
    }
}
