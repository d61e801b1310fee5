//! Endpoint repository port: supplies the healthy-endpoint snapshot and the
//! model-to-endpoint mapping. Health checking itself lives entirely outside
//! the core; the core only ever reads the results.

use async_trait::async_trait;

use crate::endpoint::Endpoint;

#[async_trait]
pub trait EndpointRepository: Send + Sync {
    /// Endpoints currently in a routable health state.
    async fn healthy_endpoints(&self) -> Vec<Endpoint>;

    /// Canonical URLs the registry believes currently serve `model_name`.
    async fn endpoints_for_model(&self, model_name: &str) -> Vec<String>;
}
