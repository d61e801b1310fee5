//! Alias Resolver: expands a virtual model name into endpoint URLs plus a
//! per-endpoint rewrite map, so the forwarder can substitute the real model
//! name into the forwarded body.
//!
//! Stateless by design — it holds no state of its own beyond the
//! [`AliasMap`] it's given, deferring entirely to the model registry for
//! which endpoints actually serve each actual model name.

use std::collections::HashMap;

use relay_types::ports::ModelRegistry;
use relay_types::AliasMap;

/// Resolve `alias_name` to a map of `endpointURL → actualModel`. Returns an
/// empty map when the name isn't configured or no endpoint serves any of
/// its actual models. When multiple actual models resolve to the same
/// endpoint, the first one encountered in configured order wins.
pub async fn resolve_endpoints(
    aliases: &AliasMap,
    alias_name: &str,
    registry: &dyn ModelRegistry,
) -> HashMap<String, String> {
    let mut rewrite = HashMap::new();

    let Some(actual_names) = aliases.actual_names(alias_name) else {
        return rewrite;
    };

    for actual_name in actual_names {
        for url in registry.endpoints_for_model(actual_name).await {
            rewrite.entry(url).or_insert_with(|| actual_name.clone());
        }
    }

    rewrite
}
