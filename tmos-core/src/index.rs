//! Partition-tolerant object lookup.
//!
//! References inside TMOS objects do not always use the same qualification as
//! the object they point to: a virtual server in `/Tenant1` may say
//! `pool app_pool` for `/Tenant1/app_pool`, an iRule may name `/Common/web`
//! while an old dump stores `web`. [`TreeIndex`] is built once per tree and maps
//! both the stored key and its short name (last `/` segment) to the full path,
//! so each reference costs a hash lookup plus a suffix check.

use std::collections::HashMap;

use crate::tree::ConfigTree;

#[derive(Debug, Default)]
struct ScopeIndex {
    paths: Vec<Vec<String>>,
    by_key: HashMap<String, Vec<usize>>,
    by_short: HashMap<String, Vec<usize>>,
}

/// Lookup index over every leaf with at least `module type name` segments.
#[derive(Debug, Default)]
pub struct TreeIndex {
    scopes: HashMap<String, ScopeIndex>,
}

impl TreeIndex {
    pub fn build(tree: &ConfigTree) -> Self {
        let mut index = Self::default();
        for (path, _) in tree.leaves() {
            if path.len() < 3 {
                continue;
            }
            let scope = format!("{} {}", path[0], path[1]);
            let key = path[path.len() - 1];
            let entry = index.scopes.entry(scope).or_default();
            let id = entry.paths.len();
            entry
                .by_key
                .entry(key.to_string())
                .or_default()
                .push(id);
            entry
                .by_short
                .entry(short_name(key).to_string())
                .or_default()
                .push(id);
            entry
                .paths
                .push(path.iter().map(|s| (*s).to_string()).collect());
        }
        index
    }

    /// Find the stored path for `name` within `scope` (for example `"ltm pool"`).
    ///
    /// An exact key match wins; otherwise the first stored path (in key order)
    /// whose key and `name` agree up to a leading partition/folder prefix.
    pub fn lookup(&self, scope: &str, name: &str) -> Option<&[String]> {
        let scope_index = self.scopes.get(scope)?;

        if let Some(ids) = scope_index.by_key.get(name) {
            return ids.first().map(|&id| scope_index.paths[id].as_slice());
        }

        let ids = scope_index.by_short.get(short_name(name))?;
        let mut candidates = ids
            .iter()
            .map(|&id| scope_index.paths[id].as_slice())
            .filter(|path| path.last().is_some_and(|key| names_match(name, key)));
        let found = candidates.next()?;
        if candidates.next().is_some() {
            tracing::debug!(
                scope,
                name,
                chosen = %found.join(" "),
                "ambiguous partition-tolerant match"
            );
        }
        Some(found)
    }

    /// Stored keys within a scope, in key order.
    pub fn keys(&self, scope: &str) -> Vec<&str> {
        self.scopes
            .get(scope)
            .map(|scope_index| {
                scope_index
                    .paths
                    .iter()
                    .filter_map(|path| path.last().map(String::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of indexed objects across all scopes.
    pub fn len(&self) -> usize {
        self.scopes.values().map(|scope| scope.paths.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Last `/`-separated segment of an object name.
pub fn short_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Whether `reference` and `stored` name the same object modulo a leading
/// partition or folder prefix on either side.
pub fn names_match(reference: &str, stored: &str) -> bool {
    reference == stored || is_path_suffix(stored, reference) || is_path_suffix(reference, stored)
}

fn is_path_suffix(longer: &str, suffix: &str) -> bool {
    !suffix.is_empty()
        && longer.len() > suffix.len()
        && longer.ends_with(suffix)
        && longer.as_bytes()[longer.len() - suffix.len() - 1] == b'/'
}
