use crate::base::dig_base_config;
use crate::diagnostic::Diagnostic;
use crate::dialect::{DialectSelection, PatternDialect};
use crate::dig::{dig_virtual, AppBundle};
use crate::index::TreeIndex;
use crate::parser::SourceInfo;
use crate::resolve::Resolver;
use crate::stats::ParseStats;
use crate::tree::ConfigTree;

const VIRTUAL_SCOPE: &str = "ltm virtual";

/// Result of one parse pass. Immutable; every dig borrows it shared.
#[derive(Debug)]
pub struct ParsedConfig {
    pub(crate) tree: ConfigTree,
    pub(crate) index: TreeIndex,
    pub(crate) version: String,
    pub(crate) selection: DialectSelection,
    pub(crate) sources: Vec<SourceInfo>,
    pub(crate) stats: ParseStats,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl ParsedConfig {
    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn index(&self) -> &TreeIndex {
        &self.index
    }

    /// Version string from the first file's header.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn selection(&self) -> &DialectSelection {
        &self.selection
    }

    pub fn dialect(&self) -> &'static PatternDialect {
        self.selection.dialect
    }

    pub fn sources(&self) -> &[SourceInfo] {
        &self.sources
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Parse-time diagnostics; each bundle carries its own as well.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.tree, &self.index)
    }

    /// Stored keys of every virtual server, sorted.
    pub fn app_names(&self) -> Vec<&str> {
        self.index.keys(VIRTUAL_SCOPE)
    }

    /// Dig one virtual server by name; `None` if the tree has no such server.
    pub fn app(&self, name: &str) -> Option<AppBundle> {
        let resolver = self.resolver();
        let found = resolver.resolve(VIRTUAL_SCOPE, name)?;
        Some(dig_virtual(found.key(), found.body, resolver, self.dialect()))
    }

    /// Dig every virtual server, in sorted name order.
    #[cfg(not(feature = "parallel"))]
    pub fn apps(&self) -> Vec<AppBundle> {
        self.app_names()
            .into_iter()
            .filter_map(|name| self.app(name))
            .collect()
    }

    /// Dig every virtual server concurrently, in sorted name order.
    #[cfg(feature = "parallel")]
    pub fn apps(&self) -> Vec<AppBundle> {
        use rayon::prelude::*;

        self.app_names()
            .into_par_iter()
            .filter_map(|name| self.app(name))
            .collect()
    }

    /// Reconstitute infrastructure objects of the given `module type` kinds.
    pub fn base_config(&self, kinds: &[&str]) -> String {
        dig_base_config(&self.tree, kinds)
    }
}
