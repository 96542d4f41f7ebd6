use tmos_core::{ConfigTree, TreeNode};

/// Render a config tree with a configurable max depth.
///
/// Branches print their key; leaves print their key followed by `{...}`.
pub fn render_tree(tree: &ConfigTree, max_depth: usize) -> String {
    let mut out = String::new();
    render_branch(tree, 0, max_depth, &mut out);
    out
}

fn render_branch(tree: &ConfigTree, depth: usize, max_depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for (key, node) in tree.children() {
        match node {
            TreeNode::Leaf(_) => out.push_str(&format!("{indent}{key} {{...}}\n")),
            TreeNode::Branch(child) => {
                out.push_str(&format!("{indent}{key} ({})\n", child.leaf_count()));
                if depth + 1 < max_depth {
                    render_branch(child, depth + 1, max_depth, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tmos_core::{ConfigTree, ObjectRecord};

    use super::render_tree;

    fn tree() -> ConfigTree {
        ConfigTree::from_records(
            ["ltm pool /Common/a", "ltm pool /Common/b", "net vlan /Common/v1"]
                .iter()
                .map(|path| ObjectRecord {
                    path: path.split_whitespace().map(ToOwned::to_owned).collect(),
                    body: String::new(),
                }),
        )
    }

    #[test]
    fn renders_to_requested_depth() {
        assert_eq!(render_tree(&tree(), 1), "ltm (2)\nnet (1)\n");
        assert_eq!(
            render_tree(&tree(), 3),
            "ltm (2)\n  pool (2)\n    /Common/a {...}\n    /Common/b {...}\nnet (1)\n  vlan (1)\n    /Common/v1 {...}\n"
        );
    }

    #[test]
    fn zero_depth_still_lists_top_level() {
        assert_eq!(render_tree(&tree(), 0), "ltm (2)\nnet (1)\n");
    }
}
