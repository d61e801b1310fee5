//! The output of a routing strategy: what it did and the machine-readable
//! reason it did it.

use serde::{Deserialize, Serialize};

/// What a routing strategy decided to do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingAction {
    Routed,
    Fallback,
    Rejected,
}

/// The closed set of machine-readable reason codes a strategy may emit.
/// Implementations must draw exclusively from this set (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingReason {
    ModelFound,
    ModelNotFound,
    ModelNotFoundFallback,
    ModelUnavailable,
    ModelUnavailableNoFallback,
    ModelUnavailableCompatibleOnly,
    AllHealthyFallback,
    ModelFoundNoRefresh,
    ModelUnavailableNoRefresh,
    DiscoveryFailedNoFallback,
    DiscoveryFailedCompatibleOnly,
    DiscoveryFailedAllFallback,
    NoHealthyAfterDiscovery,
    ModelUnavailableAfterDiscovery,
    AllHealthyAfterDiscovery,
}

impl RoutingReason {
    /// The symbolic string form used in logs and in the spec's closed set.
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingReason::ModelFound => "model_found",
            RoutingReason::ModelNotFound => "model_not_found",
            RoutingReason::ModelNotFoundFallback => "model_not_found_fallback",
            RoutingReason::ModelUnavailable => "model_unavailable",
            RoutingReason::ModelUnavailableNoFallback => "model_unavailable_no_fallback",
            RoutingReason::ModelUnavailableCompatibleOnly => "model_unavailable_compatible_only",
            RoutingReason::AllHealthyFallback => "all_healthy_fallback",
            RoutingReason::ModelFoundNoRefresh => "model_found_no_refresh",
            RoutingReason::ModelUnavailableNoRefresh => "model_unavailable_no_refresh",
            RoutingReason::DiscoveryFailedNoFallback => "discovery_failed_no_fallback",
            RoutingReason::DiscoveryFailedCompatibleOnly => "discovery_failed_compatible_only",
            RoutingReason::DiscoveryFailedAllFallback => "discovery_failed_all_fallback",
            RoutingReason::NoHealthyAfterDiscovery => "no_healthy_after_discovery",
            RoutingReason::ModelUnavailableAfterDiscovery => "model_unavailable_after_discovery",
            RoutingReason::AllHealthyAfterDiscovery => "all_healthy_after_discovery",
        }
    }
}

impl std::fmt::Display for RoutingReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record describing what a strategy did and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub strategy_name: &'static str,
    pub action: RoutingAction,
    pub reason: RoutingReason,
}

impl RoutingDecision {
    pub fn new(strategy_name: &'static str, action: RoutingAction, reason: RoutingReason) -> Self {
        Self {
            strategy_name,
            action,
            reason,
        }
    }
}
