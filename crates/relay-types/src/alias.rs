//! Configuration-supplied virtual-model aliasing.

use std::collections::HashMap;

/// `virtualName → [actualName, …]`, plus a reverse index derived at load
/// time. Each actual name may be served by a disjoint subset of endpoints;
/// resolving endpoint URLs from an alias is the [`crate::ports`] layer's job,
/// this type only owns the name-to-name mapping.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    forward: HashMap<String, Vec<String>>,
    reverse: HashMap<String, String>,
}

impl AliasMap {
    /// Build from a configured `virtualName → [actualName, …]` table.
    /// When an actual name appears under more than one virtual name, the
    /// reverse index keeps whichever virtual name was inserted first —
    /// configured order wins, mirroring the resolver's own determinism
    /// rule (spec §4.4).
    pub fn from_forward(forward: HashMap<String, Vec<String>>) -> Self {
        let mut reverse = HashMap::new();
        for (virtual_name, actual_names) in &forward {
            for actual_name in actual_names {
                reverse.entry(actual_name.clone()).or_insert_with(|| virtual_name.clone());
            }
        }
        Self { forward, reverse }
    }

    pub fn actual_names(&self, virtual_name: &str) -> Option<&[String]> {
        self.forward.get(virtual_name).map(Vec::as_slice)
    }

    pub fn is_alias(&self, virtual_name: &str) -> bool {
        self.forward.contains_key(virtual_name)
    }

    pub fn virtual_name_for(&self, actual_name: &str) -> Option<&str> {
        self.reverse.get(actual_name).map(String::as_str)
    }
}
