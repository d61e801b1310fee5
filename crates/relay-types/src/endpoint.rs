//! Backend endpoints as seen by the routing core.

use serde::{Deserialize, Serialize};

/// Health state of an endpoint as reported by the (external) health-check
/// subsystem. Only `Healthy` (and, per configuration, `Busy`/`Warming`) are
/// eligible inputs to routing — filtering happens upstream, in the endpoint
/// repository, before the core ever sees the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointStatus {
    Healthy,
    Busy,
    Warming,
    Offline,
    Unhealthy,
    Unknown,
}

impl EndpointStatus {
    pub fn is_routable(self) -> bool {
        matches!(self, EndpointStatus::Healthy | EndpointStatus::Busy | EndpointStatus::Warming)
    }
}

/// A backend inference endpoint, identified by its canonical URL string.
///
/// `weight` and `priority` are informational metadata an upstream scheduler
/// may read to order or bias selection within a routable set; the core
/// itself never filters or reorders on them (it performs set-selection
/// only, never scheduling).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub url_string: String,
    pub status: EndpointStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

impl Endpoint {
    pub fn new(url_string: impl Into<String>, status: EndpointStatus) -> Self {
        Self {
            url_string: url_string.into(),
            status,
            weight: None,
            priority: None,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }
}

// Identity is the canonical URL alone: `weight`/`priority` are informational
// and must not affect set membership or lookup when endpoints are keyed or
// intersected by URL.
impl std::hash::Hash for Endpoint {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.url_string.hash(state);
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.url_string == other.url_string
    }
}

impl Eq for Endpoint {}
