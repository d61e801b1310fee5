//! Discovery service port: invoked by the Discovery routing strategy on
//! cache misses to trigger an out-of-band re-scan of backends.

use async_trait::async_trait;

#[async_trait]
pub trait DiscoveryService: Send + Sync {
    /// Trigger a refresh of known endpoints and their model mappings.
    /// Errors are opaque to the core — it only distinguishes success from
    /// failure, applying `fallbackBehavior` on the latter.
    async fn refresh_endpoints(&self) -> Result<(), DiscoveryError>;
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("discovery refresh failed: {0}")]
pub struct DiscoveryError(pub String);
