//! Routing Strategies: Strict, Optimistic, and Discovery all implement the
//! same contract — turn `(healthy endpoints, model → endpoints)` into a
//! routable set plus a decision everyone can log uniformly.

pub mod discovery;
pub mod optimistic;
pub mod strict;

use std::collections::HashSet;

use async_trait::async_trait;
use relay_config::{FallbackBehavior, ModelRoutingStrategyConfig, StrategyKind};
use relay_types::{Endpoint, RoutingDecision, RoutingError};

pub use discovery::DiscoveryStrategy;
pub use optimistic::OptimisticStrategy;
pub use strict::StrictStrategy;

/// The shared contract every routing strategy implements. The returned
/// endpoint list and decision are always populated — even in the Rejected
/// case — so callers can log uniformly regardless of outcome.
#[async_trait]
pub trait RoutingStrategy: Send + Sync {
    async fn routable_endpoints(
        &self,
        model_name: &str,
        healthy_endpoints: &[Endpoint],
        model_endpoints: &[String],
    ) -> (Vec<Endpoint>, RoutingDecision, Option<RoutingError>);

    fn name(&self) -> &'static str;

    /// Entry point callers should actually use: delegates to
    /// [`RoutingStrategy::routable_endpoints`] and emits the single
    /// structured log line every routing decision gets, regardless of which
    /// strategy produced it.
    async fn route(
        &self,
        model_name: &str,
        healthy_endpoints: &[Endpoint],
        model_endpoints: &[String],
    ) -> (Vec<Endpoint>, RoutingDecision, Option<RoutingError>) {
        let (endpoints, decision, error) = self
            .routable_endpoints(model_name, healthy_endpoints, model_endpoints)
            .await;
        tracing::info!(
            reason = %decision.reason,
            strategy = decision.strategy_name,
            action = ?decision.action,
            endpoint_count = endpoints.len(),
            "routing decision"
        );
        (endpoints, decision, error)
    }
}

/// Endpoints present in both `healthy_endpoints` and `model_endpoints`,
/// matched by URL, preserving `healthy_endpoints`'s order.
pub(crate) fn intersect(healthy_endpoints: &[Endpoint], model_endpoints: &[String]) -> Vec<Endpoint> {
    let model_urls: HashSet<&str> = model_endpoints.iter().map(String::as_str).collect();
    healthy_endpoints
        .iter()
        .filter(|e| model_urls.contains(e.url_string.as_str()))
        .cloned()
        .collect()
}

/// Build the configured strategy plus its discovery collaborator, when the
/// config names the discovery strategy. Mirrors the registry's
/// `create_provider_from_config` factory shape: one switch on a `type`
/// discriminant producing a boxed trait object.
pub fn strategy_from_config(
    config: &ModelRoutingStrategyConfig,
    discovery: Option<std::sync::Arc<dyn relay_types::ports::DiscoveryService>>,
    endpoint_repository: Option<std::sync::Arc<dyn relay_types::ports::EndpointRepository>>,
) -> Box<dyn RoutingStrategy> {
    match config.kind {
        StrategyKind::Strict => Box::new(StrictStrategy),
        StrategyKind::Optimistic => Box::new(OptimisticStrategy::new(to_core_fallback(
            config.options.fallback_behavior,
        ))),
        StrategyKind::Discovery => Box::new(DiscoveryStrategy::new(
            to_core_fallback(config.options.fallback_behavior),
            config.options.discovery_refresh_on_miss,
            config.options.discovery_timeout,
            discovery.expect("discovery strategy requires a discovery service"),
            endpoint_repository.expect("discovery strategy requires an endpoint repository"),
        )),
    }
}

/// Mirror of [`relay_config::FallbackBehavior`] local to the core, so the
/// strategies don't need to depend on config's serde derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreFallbackBehavior {
    None,
    CompatibleOnly,
    All,
}

fn to_core_fallback(behavior: FallbackBehavior) -> CoreFallbackBehavior {
    match behavior {
        FallbackBehavior::None => CoreFallbackBehavior::None,
        FallbackBehavior::CompatibleOnly => CoreFallbackBehavior::CompatibleOnly,
        FallbackBehavior::All => CoreFallbackBehavior::All,
    }
}
