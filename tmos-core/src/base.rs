//! Infrastructure objects that belong to no single application.

use crate::resolve::config_line;
use crate::tree::ConfigTree;

/// `module type` pairs collected by default.
pub const DEFAULT_BASE_OBJECTS: &[&str] =
    &["net vlan", "net self", "net route-domain", "auth partition"];

/// Reconstitute every object under each `module type` in `kinds`, in order.
pub fn dig_base_config(tree: &ConfigTree, kinds: &[&str]) -> String {
    let mut config = String::new();
    for kind in kinds {
        let prefix: Vec<&str> = kind.split_whitespace().collect();
        if prefix.is_empty() {
            continue;
        }
        let Some(subtree) = tree.subtree(&prefix) else {
            tracing::debug!(kind, "no base objects of this kind");
            continue;
        };
        for (path, body) in subtree.leaves() {
            config.push_str(&config_line(prefix.iter().chain(&path).copied(), body));
        }
    }
    config
}
