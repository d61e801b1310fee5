//! `RELAY_`-prefixed environment variable overrides applied on top of a
//! file- or default-loaded [`crate::RelayConfig`].

use std::env;

use crate::error::ConfigError;
use crate::routing::{FallbackBehavior, StrategyKind};
use crate::RelayConfig;

const ENV_PREFIX: &str = "RELAY_";

fn var(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}{name}")).ok()
}

/// Override fields of `config` from `RELAY_*` environment variables.
/// Unset variables leave the existing value untouched; malformed values are
/// reported rather than silently ignored, since these overrides typically
/// run at process startup where fail-fast is appropriate.
pub fn apply_env_overrides(config: &mut RelayConfig) -> Result<(), ConfigError> {
    if let Some(raw) = var("MAX_BODY_SIZE") {
        config.limits.max_body_size = raw.parse().map_err(|_| ConfigError::Environment {
            variable: format!("{ENV_PREFIX}MAX_BODY_SIZE"),
            reason: format!("not a valid integer: {raw}"),
        })?;
    }

    if let Some(raw) = var("MAX_EXTRACTION_TIMEOUT_MS") {
        let millis: u64 = raw.parse().map_err(|_| ConfigError::Environment {
            variable: format!("{ENV_PREFIX}MAX_EXTRACTION_TIMEOUT_MS"),
            reason: format!("not a valid integer: {raw}"),
        })?;
        config.limits.max_extraction_timeout = std::time::Duration::from_millis(millis);
    }

    if let Some(raw) = var("ROUTING_STRATEGY") {
        config.routing.kind = match raw.to_lowercase().as_str() {
            "strict" => StrategyKind::Strict,
            "optimistic" => StrategyKind::Optimistic,
            "discovery" => StrategyKind::Discovery,
            other => {
                return Err(ConfigError::Environment {
                    variable: format!("{ENV_PREFIX}ROUTING_STRATEGY"),
                    reason: format!("unknown strategy `{other}`"),
                })
            }
        };
    }

    if let Some(raw) = var("ROUTING_FALLBACK_BEHAVIOR") {
        config.routing.options.fallback_behavior = match raw.to_lowercase().as_str() {
            "none" => FallbackBehavior::None,
            "compatible_only" => FallbackBehavior::CompatibleOnly,
            "all" => FallbackBehavior::All,
            other => {
                return Err(ConfigError::Environment {
                    variable: format!("{ENV_PREFIX}ROUTING_FALLBACK_BEHAVIOR"),
                    reason: format!("unknown fallback behavior `{other}`"),
                })
            }
        };
    }

    if let Some(raw) = var("ROUTING_DISCOVERY_REFRESH_ON_MISS") {
        config.routing.options.discovery_refresh_on_miss =
            parse_bool(&raw).ok_or_else(|| ConfigError::Environment {
                variable: format!("{ENV_PREFIX}ROUTING_DISCOVERY_REFRESH_ON_MISS"),
                reason: format!("not a valid boolean: {raw}"),
            })?;
    }

    if let Some(raw) = var("ROUTING_DISCOVERY_TIMEOUT_MS") {
        let millis: u64 = raw.parse().map_err(|_| ConfigError::Environment {
            variable: format!("{ENV_PREFIX}ROUTING_DISCOVERY_TIMEOUT_MS"),
            reason: format!("not a valid integer: {raw}"),
        })?;
        config.routing.options.discovery_timeout = std::time::Duration::from_millis(millis);
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variable tests mutate global process state, so they're
    // serialized behind a single lock to avoid cross-test interference.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn overrides_max_body_size() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("RELAY_MAX_BODY_SIZE", "2048");
        let mut config = RelayConfig::default();
        apply_env_overrides(&mut config).unwrap();
        assert_eq!(config.limits.max_body_size, 2048);
        env::remove_var("RELAY_MAX_BODY_SIZE");
    }

    #[test]
    fn rejects_unknown_strategy() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("RELAY_ROUTING_STRATEGY", "bogus");
        let mut config = RelayConfig::default();
        assert!(apply_env_overrides(&mut config).is_err());
        env::remove_var("RELAY_ROUTING_STRATEGY");
    }
}
