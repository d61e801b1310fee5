//! Discovery routing strategy: on a cache miss, triggers an out-of-band
//! refresh of the endpoint registry before giving up, bounded by a
//! configurable timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use relay_types::ports::{DiscoveryService, EndpointRepository};
use relay_types::{Endpoint, RoutingAction, RoutingDecision, RoutingError, RoutingReason};

use super::{intersect, CoreFallbackBehavior, RoutingStrategy};

pub struct DiscoveryStrategy {
    fallback_behavior: CoreFallbackBehavior,
    refresh_on_miss: bool,
    timeout: Duration,
    discovery: Arc<dyn DiscoveryService>,
    endpoint_repository: Arc<dyn EndpointRepository>,
}

impl DiscoveryStrategy {
    pub fn new(
        fallback_behavior: CoreFallbackBehavior,
        refresh_on_miss: bool,
        timeout: Duration,
        discovery: Arc<dyn DiscoveryService>,
        endpoint_repository: Arc<dyn EndpointRepository>,
    ) -> Self {
        Self {
            fallback_behavior,
            refresh_on_miss,
            timeout,
            discovery,
            endpoint_repository,
        }
    }

    fn rejected(&self, reason: RoutingReason, error: RoutingError) -> (Vec<Endpoint>, RoutingDecision, Option<RoutingError>) {
        let decision = RoutingDecision::new(self.name(), RoutingAction::Rejected, reason);
        (Vec::new(), decision, Some(error))
    }
}

#[async_trait]
impl RoutingStrategy for DiscoveryStrategy {
    async fn routable_endpoints(
        &self,
        model_name: &str,
        healthy_endpoints: &[Endpoint],
        model_endpoints: &[String],
    ) -> (Vec<Endpoint>, RoutingDecision, Option<RoutingError>) {
        let intersection = intersect(healthy_endpoints, model_endpoints);
        if !intersection.is_empty() {
            let decision =
                RoutingDecision::new(self.name(), RoutingAction::Routed, RoutingReason::ModelFoundNoRefresh);
            return (intersection, decision, None);
        }

        if !self.refresh_on_miss {
            let error = RoutingError::new(
                model_name,
                self.name(),
                RoutingReason::ModelUnavailableNoRefresh.as_str(),
                healthy_endpoints.len(),
                model_endpoints.to_vec(),
            );
            return self.rejected(RoutingReason::ModelUnavailableNoRefresh, error);
        }

        let refresh_result = tokio::time::timeout(self.timeout, self.discovery.refresh_endpoints()).await;

        let refresh_error = match refresh_result {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err.to_string()),
            Err(_) => Some(format!("discovery refresh timed out after {:?}", self.timeout)),
        };

        if let Some(cause) = refresh_error {
            return match self.fallback_behavior {
                CoreFallbackBehavior::None => {
                    let error = RoutingError::new(
                        model_name,
                        self.name(),
                        RoutingReason::DiscoveryFailedNoFallback.as_str(),
                        healthy_endpoints.len(),
                        model_endpoints.to_vec(),
                    )
                    .with_cause(cause);
                    self.rejected(RoutingReason::DiscoveryFailedNoFallback, error)
                }
                CoreFallbackBehavior::CompatibleOnly => {
                    let error = RoutingError::new(
                        model_name,
                        self.name(),
                        RoutingReason::DiscoveryFailedCompatibleOnly.as_str(),
                        healthy_endpoints.len(),
                        model_endpoints.to_vec(),
                    )
                    .with_cause(cause);
                    self.rejected(RoutingReason::DiscoveryFailedCompatibleOnly, error)
                }
                CoreFallbackBehavior::All => {
                    let decision = RoutingDecision::new(
                        self.name(),
                        RoutingAction::Fallback,
                        RoutingReason::DiscoveryFailedAllFallback,
                    );
                    (healthy_endpoints.to_vec(), decision, None)
                }
            };
        }

        let refreshed_healthy = self.endpoint_repository.healthy_endpoints().await;

        if refreshed_healthy.is_empty() {
            let error = RoutingError::new(
                model_name,
                self.name(),
                RoutingReason::NoHealthyAfterDiscovery.as_str(),
                0,
                model_endpoints.to_vec(),
            );
            return self.rejected(RoutingReason::NoHealthyAfterDiscovery, error);
        }

        let refreshed_model_endpoints = self.endpoint_repository.endpoints_for_model(model_name).await;
        let refreshed_intersection = intersect(&refreshed_healthy, &refreshed_model_endpoints);

        if !refreshed_intersection.is_empty() {
            let decision = RoutingDecision::new(self.name(), RoutingAction::Routed, RoutingReason::ModelFound);
            return (refreshed_intersection, decision, None);
        }

        match self.fallback_behavior {
            CoreFallbackBehavior::All => {
                let decision = RoutingDecision::new(
                    self.name(),
                    RoutingAction::Fallback,
                    RoutingReason::AllHealthyAfterDiscovery,
                );
                (refreshed_healthy, decision, None)
            }
            CoreFallbackBehavior::None | CoreFallbackBehavior::CompatibleOnly => {
                let error = RoutingError::new(
                    model_name,
                    self.name(),
                    RoutingReason::ModelUnavailableAfterDiscovery.as_str(),
                    refreshed_healthy.len(),
                    refreshed_model_endpoints,
                );
                self.rejected(RoutingReason::ModelUnavailableAfterDiscovery, error)
            }
        }
    }

    fn name(&self) -> &'static str {
        "discovery"
    }
}
