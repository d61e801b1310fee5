//! Request-routing core: inspects an inbound request into a
//! [`relay_types::RequestProfile`], resolves model aliases, picks a routable
//! endpoint set via a pluggable [`routing::RoutingStrategy`], and extracts
//! runtime metrics from a provider's response. No transport, no
//! authentication, no scheduling within a routable set — those live outside
//! this crate.

pub mod alias_resolver;
#[cfg(feature = "debug-dump")]
pub mod debug_dump;
pub mod inspect;
pub mod metrics;
pub mod routing;

pub use alias_resolver::resolve_endpoints;
#[cfg(feature = "debug-dump")]
pub use debug_dump::InspectorDump;
pub use inspect::path::path_inspector_from_registry;
pub use inspect::{BodyInspector, InspectableRequest, Inspector, InspectorChain, PathInspector, RequestBody};
pub use metrics::MetricsExtractor;
pub use routing::{
    strategy_from_config, CoreFallbackBehavior, DiscoveryStrategy, OptimisticStrategy, RoutingStrategy, StrictStrategy,
};
