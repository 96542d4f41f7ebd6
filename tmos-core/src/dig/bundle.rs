use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::diagnostic::Diagnostic;

/// Reconstructed configuration for one virtual server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppBundle {
    /// Stored key of the virtual server.
    pub name: String,
    /// `destination` value, empty when the body has none.
    pub destination: String,
    /// The virtual server line followed by every resolved object, one line each.
    pub config: String,
    pub map: ReferenceMap,
    pub defaults: DefaultCounts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl AppBundle {
    /// Reconstructed object lines, header line first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.config.lines().filter(|line| !line.is_empty())
    }
}

/// Objects an application actually reaches, by feature.
///
/// Every set holds stored keys of objects present in the tree; references
/// that resolved to nothing are only counted in [`DefaultCounts`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceMap {
    /// Members of the default pool as `address:port` or `fqdn-node:port`.
    pub pools: Vec<String>,
    pub nodes: BTreeSet<String>,
    pub monitors: BTreeSet<String>,
    pub profiles: BTreeSet<String>,
    pub rules: BTreeSet<String>,
    pub policies: BTreeSet<String>,
    pub persistence: BTreeSet<String>,
    pub snat_pools: BTreeSet<String>,
    pub rule_pools: BTreeSet<String>,
    pub policy_pools: BTreeSet<String>,
}

/// References with no tree entry, assumed to be system defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DefaultCounts {
    pub monitors: usize,
    pub profiles: usize,
    pub rules: usize,
    pub policies: usize,
    pub persistence: usize,
    pub nodes: usize,
    pub pools: usize,
}

impl DefaultCounts {
    pub fn total(&self) -> usize {
        self.monitors
            + self.profiles
            + self.rules
            + self.policies
            + self.persistence
            + self.nodes
            + self.pools
    }
}

/// Drop repeated lines, keeping the first occurrence of each.
pub(crate) fn dedup_lines(lines: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .filter(|line| seen.insert(line.clone()))
        .collect()
}
