//! Strict routing strategy: only the healthy/model intersection, never a
//! fallback.

use async_trait::async_trait;
use relay_types::{Endpoint, RoutingAction, RoutingDecision, RoutingError, RoutingReason};

use super::{intersect, RoutingStrategy};

pub struct StrictStrategy;

#[async_trait]
impl RoutingStrategy for StrictStrategy {
    async fn routable_endpoints(
        &self,
        model_name: &str,
        healthy_endpoints: &[Endpoint],
        model_endpoints: &[String],
    ) -> (Vec<Endpoint>, RoutingDecision, Option<RoutingError>) {
        let intersection = intersect(healthy_endpoints, model_endpoints);

        if intersection.is_empty() {
            let decision = RoutingDecision::new(self.name(), RoutingAction::Rejected, RoutingReason::ModelUnavailable);
            let error = RoutingError::new(
                model_name,
                self.name(),
                decision.reason.as_str(),
                healthy_endpoints.len(),
                model_endpoints.to_vec(),
            );
            return (Vec::new(), decision, Some(error));
        }

        let decision = RoutingDecision::new(self.name(), RoutingAction::Routed, RoutingReason::ModelFound);
        (intersection, decision, None)
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_types::EndpointStatus;

    fn endpoint(url: &str) -> Endpoint {
        Endpoint::new(url, EndpointStatus::Healthy)
    }

    #[tokio::test]
    async fn non_empty_intersection_routes() {
        let strategy = StrictStrategy;
        let healthy = vec![endpoint("http://e1"), endpoint("http://e2")];
        let model_endpoints = vec!["http://e1".to_string()];
        let (routable, decision, error) = strategy.routable_endpoints("gpt-4", &healthy, &model_endpoints).await;
        assert_eq!(routable, vec![endpoint("http://e1")]);
        assert_eq!(decision.action, RoutingAction::Routed);
        assert_eq!(decision.reason, RoutingReason::ModelFound);
        assert!(error.is_none());
    }

    #[tokio::test]
    async fn empty_intersection_rejects() {
        let strategy = StrictStrategy;
        let healthy = vec![endpoint("http://e1")];
        let model_endpoints: Vec<String> = Vec::new();
        let (routable, decision, error) = strategy.routable_endpoints("gpt-4", &healthy, &model_endpoints).await;
        assert!(routable.is_empty());
        assert_eq!(decision.action, RoutingAction::Rejected);
        assert_eq!(decision.reason, RoutingReason::ModelUnavailable);
        assert!(error.is_some());
    }

    #[tokio::test]
    async fn never_falls_back_even_when_healthy_endpoints_exist() {
        let strategy = StrictStrategy;
        let healthy = vec![endpoint("http://e1"), endpoint("http://e2")];
        let model_endpoints = vec!["http://e3".to_string()];
        let (routable, decision, _) = strategy.routable_endpoints("gpt-4", &healthy, &model_endpoints).await;
        assert!(routable.is_empty());
        assert_eq!(decision.action, RoutingAction::Rejected);
    }
}
