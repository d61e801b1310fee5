//! Model registry port: maps model names to endpoint URLs, consumed by the
//! Alias Resolver.

use async_trait::async_trait;

#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Canonical URLs currently serving `model_name`, in configured order.
    async fn endpoints_for_model(&self, model_name: &str) -> Vec<String>;

    async fn is_model_available(&self, model_name: &str) -> bool;
}
