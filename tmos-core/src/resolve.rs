use crate::index::TreeIndex;
use crate::tree::ConfigTree;

/// An object found in the tree for a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    /// Full stored path, e.g. `["ltm", "monitor", "http", "/Common/app_http"]`.
    pub path: &'a [String],
    pub body: &'a str,
}

impl<'a> Resolved<'a> {
    /// Canonical stored key (last path segment).
    pub fn key(&self) -> &'a str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Segments between `module type` and the key, such as a monitor's kind.
    pub fn sub_path(&self) -> &'a [String] {
        if self.path.len() > 3 {
            &self.path[2..self.path.len() - 1]
        } else {
            &[]
        }
    }

    /// Reconstitute the object as `<path> {<body>}\n`.
    pub fn to_config_line(&self) -> String {
        config_line(self.path.iter().map(String::as_str), self.body)
    }
}

/// Join path segments and body into one re-parseable object line.
pub fn config_line<'s>(path: impl IntoIterator<Item = &'s str>, body: &str) -> String {
    let name = path.into_iter().collect::<Vec<_>>().join(" ");
    format!("{name} {{{body}}}\n")
}

/// Read-only view pairing a tree with its index.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    tree: &'a ConfigTree,
    index: &'a TreeIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a ConfigTree, index: &'a TreeIndex) -> Self {
        Self { tree, index }
    }

    /// Look `name` up in one scope; `None` means no record (a system default).
    pub fn resolve(&self, scope: &str, name: &str) -> Option<Resolved<'a>> {
        let path = self.index.lookup(scope, name)?;
        let segments: Vec<&str> = path.iter().map(String::as_str).collect();
        let body = self.tree.leaf(&segments)?;
        Some(Resolved { path, body })
    }

    /// Try each scope in order.
    pub fn resolve_any(&self, scopes: &[&str], name: &str) -> Option<Resolved<'a>> {
        scopes.iter().find_map(|scope| self.resolve(scope, name))
    }

    pub fn keys(&self, scope: &str) -> Vec<&'a str> {
        self.index.keys(scope)
    }

    pub fn tree(&self) -> &'a ConfigTree {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::{config_line, Resolver};
    use crate::index::TreeIndex;
    use crate::segment::ObjectRecord;
    use crate::tree::ConfigTree;

    #[test]
    fn resolves_body_and_reconstitutes_line() {
        let tree = ConfigTree::from_records([ObjectRecord {
            path: vec![
                "ltm".to_string(),
                "monitor".to_string(),
                "http".to_string(),
                "/Common/app_http".to_string(),
            ],
            body: "\n    interval 5\n".to_string(),
        }]);
        let index = TreeIndex::build(&tree);
        let resolver = Resolver::new(&tree, &index);

        let found = resolver.resolve("ltm monitor", "app_http").expect("found");
        assert_eq!(found.key(), "/Common/app_http");
        assert_eq!(found.sub_path(), ["http".to_string()]);
        assert_eq!(
            found.to_config_line(),
            "ltm monitor http /Common/app_http {\n    interval 5\n}\n"
        );
        assert!(resolver.resolve("ltm monitor", "/Common/tcp").is_none());
    }

    #[test]
    fn resolve_any_tries_scopes_in_order() {
        let tree = ConfigTree::from_records([ObjectRecord {
            path: vec![
                "apm".to_string(),
                "profile".to_string(),
                "access".to_string(),
                "/Common/ap".to_string(),
            ],
            body: " ".to_string(),
        }]);
        let index = TreeIndex::build(&tree);
        let resolver = Resolver::new(&tree, &index);
        let found = resolver
            .resolve_any(&["ltm profile", "apm profile"], "/Common/ap")
            .expect("found");
        assert_eq!(found.path[0], "apm");
    }

    #[test]
    fn single_line_body_keeps_spacing() {
        assert_eq!(
            config_line(["ltm", "node", "/Common/n1"], " address 10.0.0.1 "),
            "ltm node /Common/n1 { address 10.0.0.1 }\n"
        );
    }
}
