use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use relay_types::ports::{DiscoveryError, DiscoveryService, EndpointRepository, ProfileRegistry, ProviderProfile};
use relay_types::Endpoint;

pub struct FakeEndpointRepository {
    pub healthy: Mutex<Vec<Endpoint>>,
    pub by_model: HashMap<String, Vec<String>>,
}

impl FakeEndpointRepository {
    pub fn new(healthy: Vec<Endpoint>, by_model: HashMap<String, Vec<String>>) -> Self {
        Self {
            healthy: Mutex::new(healthy),
            by_model,
        }
    }

    pub fn set_healthy(&self, healthy: Vec<Endpoint>) {
        *self.healthy.lock().unwrap() = healthy;
    }
}

#[async_trait]
impl EndpointRepository for FakeEndpointRepository {
    async fn healthy_endpoints(&self) -> Vec<Endpoint> {
        self.healthy.lock().unwrap().clone()
    }

    async fn endpoints_for_model(&self, model_name: &str) -> Vec<String> {
        self.by_model.get(model_name).cloned().unwrap_or_default()
    }
}

/// A discovery service that, on refresh, flips a shared repository's
/// healthy set to `post_refresh_healthy`. Lets a test assert both the
/// refresh call count and its visible effect on subsequent lookups.
pub struct FakeDiscoveryService {
    pub calls: AtomicUsize,
    post_refresh_healthy: Vec<Endpoint>,
    repository: std::sync::Arc<FakeEndpointRepository>,
}

impl FakeDiscoveryService {
    pub fn new(repository: std::sync::Arc<FakeEndpointRepository>, post_refresh_healthy: Vec<Endpoint>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            post_refresh_healthy,
            repository,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiscoveryService for FakeDiscoveryService {
    async fn refresh_endpoints(&self) -> Result<(), DiscoveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.repository.set_healthy(self.post_refresh_healthy.clone());
        Ok(())
    }
}

pub struct FakeProfileRegistry {
    pub profiles: Vec<ProviderProfile>,
}

impl ProfileRegistry for FakeProfileRegistry {
    fn available_profiles(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name.clone()).collect()
    }

    fn profile(&self, name: &str) -> Option<ProviderProfile> {
        self.profiles.iter().find(|p| p.name == name).cloned()
    }
}

pub fn openai_compatible_registry() -> FakeProfileRegistry {
    use relay_types::ports::{MetricsExtractionConfig, RequestParsingRules};

    FakeProfileRegistry {
        profiles: vec![
            ProviderProfile {
                name: "openai".to_string(),
                request_parsing_rules: RequestParsingRules {
                    chat_completions_path: Some("/v1/chat/completions".to_string()),
                    completions_path: Some("/v1/completions".to_string()),
                    generate_path: None,
                },
                metrics_extraction: MetricsExtractionConfig::default(),
            },
            ProviderProfile {
                name: "ollama".to_string(),
                request_parsing_rules: RequestParsingRules {
                    chat_completions_path: Some("/v1/chat/completions".to_string()),
                    completions_path: None,
                    generate_path: Some("/api/generate".to_string()),
                },
                metrics_extraction: MetricsExtractionConfig::default(),
            },
            ProviderProfile {
                name: "lmstudio".to_string(),
                request_parsing_rules: RequestParsingRules {
                    chat_completions_path: Some("/v1/chat/completions".to_string()),
                    completions_path: None,
                    generate_path: None,
                },
                metrics_extraction: MetricsExtractionConfig::default(),
            },
        ],
    }
}

pub struct JsonBody {
    remaining: Mutex<Option<bytes::Bytes>>,
}

impl JsonBody {
    pub fn new(data: impl Into<bytes::Bytes>) -> Self {
        Self {
            remaining: Mutex::new(Some(data.into())),
        }
    }
}

#[async_trait]
impl relay_core::RequestBody for JsonBody {
    async fn next_chunk(&self) -> std::io::Result<Option<bytes::Bytes>> {
        Ok(self.remaining.lock().unwrap().take())
    }
}

pub struct JsonRequest {
    pub content_type: String,
    pub content_length: u64,
    pub body: Mutex<std::sync::Arc<dyn relay_core::RequestBody>>,
}

impl JsonRequest {
    pub fn new(json: &serde_json::Value) -> Self {
        let bytes = serde_json::to_vec(json).unwrap();
        Self {
            content_type: "application/json".to_string(),
            content_length: bytes.len() as u64,
            body: Mutex::new(std::sync::Arc::new(JsonBody::new(bytes))),
        }
    }
}

impl relay_core::InspectableRequest for JsonRequest {
    fn content_type(&self) -> Option<&str> {
        Some(&self.content_type)
    }

    fn content_length(&self) -> Option<u64> {
        Some(self.content_length)
    }

    fn body(&self) -> std::sync::Arc<dyn relay_core::RequestBody> {
        self.body.lock().unwrap().clone()
    }

    fn replace_body(&self, body: std::sync::Arc<dyn relay_core::RequestBody>) {
        *self.body.lock().unwrap() = body;
    }
}
