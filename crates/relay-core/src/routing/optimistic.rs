//! Optimistic routing strategy: like Strict, but parameterized by a
//! fallback behavior for the cases where no exact match exists.

use async_trait::async_trait;
use relay_types::{Endpoint, RoutingAction, RoutingDecision, RoutingError, RoutingReason};

use super::{intersect, CoreFallbackBehavior, RoutingStrategy};

pub struct OptimisticStrategy {
    fallback_behavior: CoreFallbackBehavior,
}

impl OptimisticStrategy {
    pub fn new(fallback_behavior: CoreFallbackBehavior) -> Self {
        Self { fallback_behavior }
    }
}

#[async_trait]
impl RoutingStrategy for OptimisticStrategy {
    async fn routable_endpoints(
        &self,
        model_name: &str,
        healthy_endpoints: &[Endpoint],
        model_endpoints: &[String],
    ) -> (Vec<Endpoint>, RoutingDecision, Option<RoutingError>) {
        let intersection = intersect(healthy_endpoints, model_endpoints);

        if !intersection.is_empty() {
            let decision = RoutingDecision::new(self.name(), RoutingAction::Routed, RoutingReason::ModelFound);
            return (intersection, decision, None);
        }

        if model_endpoints.is_empty() {
            return match self.fallback_behavior {
                CoreFallbackBehavior::None | CoreFallbackBehavior::CompatibleOnly => {
                    let decision =
                        RoutingDecision::new(self.name(), RoutingAction::Rejected, RoutingReason::ModelNotFound);
                    (Vec::new(), decision, None)
                }
                CoreFallbackBehavior::All => {
                    let decision = RoutingDecision::new(
                        self.name(),
                        RoutingAction::Fallback,
                        RoutingReason::ModelNotFoundFallback,
                    );
                    (healthy_endpoints.to_vec(), decision, None)
                }
            };
        }

        match self.fallback_behavior {
            CoreFallbackBehavior::None => {
                let decision = RoutingDecision::new(
                    self.name(),
                    RoutingAction::Rejected,
                    RoutingReason::ModelUnavailableNoFallback,
                );
                (Vec::new(), decision, None)
            }
            CoreFallbackBehavior::CompatibleOnly => {
                let decision = RoutingDecision::new(
                    self.name(),
                    RoutingAction::Rejected,
                    RoutingReason::ModelUnavailableCompatibleOnly,
                );
                (Vec::new(), decision, None)
            }
            CoreFallbackBehavior::All => {
                let decision =
                    RoutingDecision::new(self.name(), RoutingAction::Fallback, RoutingReason::AllHealthyFallback);
                (healthy_endpoints.to_vec(), decision, None)
            }
        }
    }

    fn name(&self) -> &'static str {
        "optimistic"
    }
}
