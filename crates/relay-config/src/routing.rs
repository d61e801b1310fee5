//! `ModelRoutingStrategy` configuration surface (spec §6).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackBehavior {
    None,
    CompatibleOnly,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Strict,
    Optimistic,
    Discovery,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelRoutingStrategyOptions {
    pub fallback_behavior: FallbackBehavior,
    pub discovery_refresh_on_miss: bool,
    #[serde(with = "duration_millis")]
    pub discovery_timeout: Duration,
}

impl Default for ModelRoutingStrategyOptions {
    fn default() -> Self {
        Self {
            fallback_behavior: FallbackBehavior::None,
            discovery_refresh_on_miss: false,
            discovery_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRoutingStrategyConfig {
    #[serde(rename = "type")]
    pub kind: StrategyKind,
    #[serde(default)]
    pub options: ModelRoutingStrategyOptions,
}

impl Default for ModelRoutingStrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::Strict,
            options: ModelRoutingStrategyOptions::default(),
        }
    }
}

impl ModelRoutingStrategyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kind != StrategyKind::Discovery && self.options.discovery_refresh_on_miss {
            return Err(ConfigError::Validation {
                field: "routing.options.discovery_refresh_on_miss".to_string(),
                reason: "only meaningful for the discovery strategy".to_string(),
            });
        }
        if self.options.discovery_timeout.is_zero() {
            return Err(ConfigError::Validation {
                field: "routing.options.discovery_timeout".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
