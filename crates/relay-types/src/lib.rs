//! Relay Types - shared data model and port traits for the routing core.
//!
//! This crate carries no behavior of its own beyond small, pure helpers
//! (alias resolution lookups, capability notability, derived metrics
//! fallbacks); it exists to break the dependency cycle between the
//! inspector/routing/extraction logic in `relay-core` and anything that
//! needs to construct or inspect the same types (config loading, fakes used
//! in tests, a future HTTP front).

pub mod alias;
pub mod capabilities;
pub mod content;
pub mod decision;
pub mod endpoint;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod profile;

pub use alias::AliasMap;
pub use capabilities::ModelCapabilities;
pub use content::{Content, ContentPart, ModelOnly};
pub use decision::{RoutingAction, RoutingDecision, RoutingReason};
pub use endpoint::{Endpoint, EndpointStatus};
pub use error::{ExtractionError, ExtractionResult, RoutingError, RoutingResult};
pub use metrics::ProviderMetrics;
pub use profile::{RequestProfile, PATH_SUPPORT_KEY};
