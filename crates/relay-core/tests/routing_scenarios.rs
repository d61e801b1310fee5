mod support;

use std::collections::HashMap;
use std::sync::Arc;

use relay_core::{CoreFallbackBehavior, DiscoveryStrategy, Inspector, InspectorChain, OptimisticStrategy, PathInspector, RoutingStrategy, StrictStrategy};
use relay_types::{EndpointStatus, RoutingAction, RoutingReason};
use support::{openai_compatible_registry, FakeDiscoveryService, FakeEndpointRepository, JsonRequest};

fn endpoint(url: &str) -> relay_types::Endpoint {
    relay_types::Endpoint::new(url, EndpointStatus::Healthy)
}

#[tokio::test]
async fn scenario_1_openai_chat_request_strict_routing_model_present() {
    let registry = openai_compatible_registry();
    let mut chain = InspectorChain::new();
    chain.add_inspector(Box::new(relay_core::BodyInspector::default()));
    chain.add_inspector(Box::new(PathInspector::new(Some(&registry))));

    let request = JsonRequest::new(&serde_json::json!({
        "model": "gpt-4",
        "messages": [{"role": "user", "content": "Hi"}],
    }));

    let profile = chain.inspect(&request, "/v1/chat/completions").await;
    assert_eq!(profile.model_name(), "gpt-4");
    assert!(profile.supported_by().contains("openai"));
    assert!(profile.supported_by().contains("ollama"));
    assert!(profile.supported_by().contains("lmstudio"));

    let healthy = vec![endpoint("http://e1"), endpoint("http://e2")];
    let model_endpoints = vec!["http://e1".to_string()];
    let strategy = StrictStrategy;
    let (routable, decision, error) = strategy.route("gpt-4", &healthy, &model_endpoints).await;
    assert_eq!(routable, vec![endpoint("http://e1")]);
    assert_eq!(decision.action, RoutingAction::Routed);
    assert_eq!(decision.reason, RoutingReason::ModelFound);
    assert!(error.is_none());
}

#[tokio::test]
async fn scenario_2_ollama_path_unknown_model_optimistic_all() {
    let registry = openai_compatible_registry();
    let mut chain = InspectorChain::new();
    chain.add_inspector(Box::new(relay_core::BodyInspector::default()));
    chain.add_inspector(Box::new(PathInspector::new(Some(&registry))));

    let request = JsonRequest::new(&serde_json::json!({"model": "nobody", "prompt": "x"}));
    let profile = chain.inspect(&request, "/api/generate").await;
    assert!(profile.supported_by().contains("ollama"));

    let healthy = vec![endpoint("http://e1")];
    let strategy = OptimisticStrategy::new(CoreFallbackBehavior::All);
    let (routable, decision, error) = strategy.route("nobody", &healthy, &[]).await;
    assert_eq!(routable, healthy);
    assert_eq!(decision.action, RoutingAction::Fallback);
    assert_eq!(decision.reason, RoutingReason::ModelNotFoundFallback);
    assert!(error.is_none());
}

#[tokio::test]
async fn scenario_6_discovery_model_initially_absent_refresh_succeeds() {
    let e1 = endpoint("http://e1");
    let e2 = endpoint("http://e2");
    let repository = Arc::new(FakeEndpointRepository::new(vec![e1.clone()], HashMap::new()));
    let discovery = Arc::new(FakeDiscoveryService::new(repository.clone(), vec![e1.clone(), e2.clone()]));

    let strategy = DiscoveryStrategy::new(
        CoreFallbackBehavior::All,
        true,
        std::time::Duration::from_millis(50),
        discovery.clone(),
        repository,
    );

    let (routable, decision, error) = strategy.route("new-model", &[e1.clone()], &[]).await;
    assert_eq!(routable, vec![e1, e2]);
    assert_eq!(decision.action, RoutingAction::Fallback);
    assert_eq!(decision.reason, RoutingReason::AllHealthyAfterDiscovery);
    assert!(error.is_none());
    assert_eq!(discovery.call_count(), 1);
}
