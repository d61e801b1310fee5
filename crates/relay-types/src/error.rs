//! Error types for the routing core.
//!
//! Two closed error enums cover the two places the core is allowed to fail
//! loudly: a routing strategy refusing to route (`RoutingError`), and a
//! metrics profile failing validation at load time (`ExtractionError`).
//! Everything else — inspector failures, per-request extraction timeouts,
//! discovery refresh errors — is transient and swallowed at the call site;
//! it never reaches these types.

use thiserror::Error;

/// Structured error returned by a routing strategy when it concludes no
/// backend is acceptable for a request.
///
/// Carries enough context (model, strategy, decision, healthy count, known
/// endpoints, optional cause) for a caller to translate it into an HTTP
/// error and for logs to explain *why* without re-deriving state. Display
/// is implemented by hand rather than via `#[error(...)]` since `cause` is
/// an optional suffix, not a fixed-position field.
#[derive(Debug, Clone)]
pub struct RoutingError {
    pub model: String,
    pub strategy: &'static str,
    pub action: &'static str,
    pub healthy_count: usize,
    pub known_endpoints: Vec<String>,
    pub cause: Option<String>,
}

impl RoutingError {
    pub fn new(
        model: impl Into<String>,
        strategy: &'static str,
        action: &'static str,
        healthy_count: usize,
        known_endpoints: Vec<String>,
    ) -> Self {
        Self {
            model: model.into(),
            strategy,
            action,
            healthy_count,
            known_endpoints,
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl std::fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

impl std::fmt::Display for RoutingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no routable endpoint for model `{}` (strategy={}, action={}, healthy={}, known={:?})",
            self.model, self.strategy, self.action, self.healthy_count, self.known_endpoints
        )?;
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RoutingError {}

/// Result alias for routing strategies.
pub type RoutingResult<T> = std::result::Result<T, RoutingError>;

/// Errors raised while validating a provider's metrics-extraction profile.
///
/// Produced only from `validate_profile`, never on the per-request hot path
/// (spec §7.3): a profile that fails validation is simply not cached as
/// validated and is re-attempted on the next use.
#[derive(Error, Debug, Clone)]
pub enum ExtractionError {
    #[error("invalid JSONPath `{path}` for field `{field}`: {reason}")]
    InvalidPath {
        field: String,
        path: String,
        reason: String,
    },

    #[error("invalid calculation expression for field `{field}`: {reason}")]
    InvalidExpression { field: String, reason: String },

    #[error("calculation for field `{field}` references unknown identifier `{identifier}`")]
    UnknownIdentifier { field: String, identifier: String },

    #[error("metrics extraction profile `{profile}` is disabled")]
    ProfileDisabled { profile: String },
}

/// Result alias for metrics-profile validation.
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;
