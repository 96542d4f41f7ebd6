//! Parse statistics.
//!
//! Returned by value from every parse pass; nothing here is kept as running
//! state between calls.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::tree::ConfigTree;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseStats {
    /// Top-level objects accepted into the tree across all files.
    pub object_count: usize,
    pub parse_time_ms: f64,
    pub files_parsed: usize,
    pub files_skipped: usize,
    /// Leaf objects per `module type` key.
    pub objects: BTreeMap<String, usize>,
}

/// Count tree leaves per `module type` (or bare module for one-segment paths).
pub fn count_objects(tree: &ConfigTree) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for (path, _) in tree.leaves() {
        let key = match path.as_slice() {
            [module, kind, ..] => format!("{module} {kind}"),
            [module] => (*module).to_string(),
            [] => continue,
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::count_objects;
    use crate::segment::ObjectRecord;
    use crate::tree::ConfigTree;

    #[test]
    fn counts_by_module_and_type() {
        let tree = ConfigTree::from_records(
            [
                "ltm pool /Common/a",
                "ltm pool /Common/b",
                "ltm monitor http /Common/h",
                "sys global-settings",
            ]
            .iter()
            .map(|path| ObjectRecord {
                path: path.split_whitespace().map(ToOwned::to_owned).collect(),
                body: String::new(),
            }),
        );
        let counts = count_objects(&tree);
        assert_eq!(counts.get("ltm pool"), Some(&2));
        assert_eq!(counts.get("ltm monitor"), Some(&1));
        assert_eq!(counts.get("sys global-settings"), Some(&1));
    }
}
