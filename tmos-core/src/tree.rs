use std::collections::BTreeMap;

use serde::Serialize;

use crate::segment::ObjectRecord;

/// A node of the configuration tree: a nested mapping or a raw object body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf(String),
    Branch(ConfigTree),
}

impl TreeNode {
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            TreeNode::Leaf(body) => Some(body),
            TreeNode::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&ConfigTree> {
        match self {
            TreeNode::Branch(tree) => Some(tree),
            TreeNode::Leaf(_) => None,
        }
    }
}

/// Nested mapping from path segment to [`TreeNode`].
///
/// Keys iterate in sorted order, so every walk over the tree is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigTree {
    children: BTreeMap<String, TreeNode>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold records into a fresh tree in iteration order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ObjectRecord>,
    {
        let mut tree = Self::new();
        for record in records {
            tree.insert_record(record);
        }
        tree
    }

    pub fn insert_record(&mut self, record: ObjectRecord) {
        self.insert(&record.path, record.body);
    }

    /// Set the leaf at `path`, creating branches on the way.
    ///
    /// Collisions overwrite: a leaf standing where a branch is needed becomes a
    /// branch, and whatever sits at the final segment is replaced by the leaf.
    pub fn insert(&mut self, path: &[String], body: String) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut current = self;
        for segment in parents {
            let node = current
                .children
                .entry(segment.clone())
                .or_insert_with(|| TreeNode::Branch(ConfigTree::new()));
            if node.as_branch().is_none() {
                *node = TreeNode::Branch(ConfigTree::new());
            }
            let TreeNode::Branch(next) = node else {
                return;
            };
            current = next;
        }
        current.children.insert(last.clone(), TreeNode::Leaf(body));
    }

    /// Structurally merge `other` into `self`; `other` wins on collisions.
    pub fn merge(&mut self, other: ConfigTree) {
        for (key, incoming) in other.children {
            match (self.children.get_mut(&key), incoming) {
                (Some(TreeNode::Branch(existing)), TreeNode::Branch(incoming)) => {
                    existing.merge(incoming);
                }
                (_, incoming) => {
                    self.children.insert(key, incoming);
                }
            }
        }
    }

    /// Return the node at a nested path.
    pub fn get(&self, path: &[&str]) -> Option<&TreeNode> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.children.get(*segment)?.as_branch()?;
        }
        current.children.get(*last)
    }

    /// Return the branch at a nested path; the empty path is the tree itself.
    pub fn subtree(&self, path: &[&str]) -> Option<&ConfigTree> {
        if path.is_empty() {
            return Some(self);
        }
        self.get(path)?.as_branch()
    }

    /// Return the leaf body at a nested path.
    pub fn leaf(&self, path: &[&str]) -> Option<&str> {
        self.get(path)?.as_leaf()
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &TreeNode)> {
        self.children.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Every leaf with its full path, depth-first in key order.
    pub fn leaves(&self) -> Vec<(Vec<&str>, &str)> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        collect_leaves(self, &mut prefix, &mut out);
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.children
            .values()
            .map(|node| match node {
                TreeNode::Leaf(_) => 1,
                TreeNode::Branch(tree) => tree.leaf_count(),
            })
            .sum()
    }
}

fn collect_leaves<'a>(
    tree: &'a ConfigTree,
    prefix: &mut Vec<&'a str>,
    out: &mut Vec<(Vec<&'a str>, &'a str)>,
) {
    for (key, node) in &tree.children {
        prefix.push(key.as_str());
        match node {
            TreeNode::Leaf(body) => out.push((prefix.clone(), body.as_str())),
            TreeNode::Branch(child) => collect_leaves(child, prefix, out),
        }
        prefix.pop();
    }
}
