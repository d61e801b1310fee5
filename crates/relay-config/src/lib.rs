//! Relay Config - configuration loading and validation for the routing core.
//!
//! Configuration is TOML-first: a [`RelayConfig`] is deserialized from a
//! config file (or [`RelayConfig::default`] when none is supplied), then
//! `RELAY_`-prefixed environment variables are applied as overrides, then
//! the whole thing is validated. Validation failures are fail-fast: the
//! process should refuse to start rather than run with a config the routing
//! core can't honor.

pub mod env;
pub mod error;
pub mod limits;
pub mod routing;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use error::ConfigError;
pub use limits::Limits;
pub use routing::{FallbackBehavior, ModelRoutingStrategyConfig, ModelRoutingStrategyOptions, StrategyKind};

use relay_types::AliasMap;

/// Top-level configuration surface the routing core consumes (spec §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub routing: ModelRoutingStrategyConfig,
    pub limits: Limits,
    /// `virtualName → [actualName, …]`; converted to an [`AliasMap`] via
    /// [`RelayConfig::alias_map`].
    pub aliases: HashMap<String, Vec<String>>,
}

impl RelayConfig {
    /// Load from a TOML file, falling back to defaults when the file is
    /// absent, then apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::File {
                path: path.display().to_string(),
                reason: source.to_string(),
            })?;
            toml::from_str(&content)?
        } else {
            tracing::debug!(path = %path.display(), "no config file found, using defaults");
            Self::default()
        };

        env::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.routing.validate()?;

        if self.limits.max_body_size == 0 {
            return Err(ConfigError::Validation {
                field: "limits.max_body_size".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        for (virtual_name, actual_names) in &self.aliases {
            if actual_names.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("aliases.{virtual_name}"),
                    reason: "alias must map to at least one actual model name".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Build the runtime [`AliasMap`] from the configured table.
    pub fn alias_map(&self) -> AliasMap {
        AliasMap::from_forward(self.aliases.clone())
    }
}
