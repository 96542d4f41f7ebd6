//! Reference resolution for one virtual server.
//!
//! [`dig_virtual`] reads a virtual-server body, pulls out each feature
//! reference with the dialect's patterns and resolves it through the
//! partition-tolerant index. Every object found is reconstituted as one
//! `module type name {body}` line; every reference that resolves to nothing is
//! counted as a system default. The tree is only ever borrowed.
//!
//! Feature order in the output is fixed: virtual server, default pool (with
//! nodes and monitors), profiles, iRules (and the pools they select), SNAT
//! pool, policies (and their pools), persistence, fallback persistence.

mod bundle;
mod policy;
mod pool;
mod profile;
mod rule;
mod snat;

use std::collections::HashMap;

pub use bundle::{AppBundle, DefaultCounts, ReferenceMap};
pub use pool::split_member;

use crate::blocks::list_names;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::dialect::{Extractor, PatternDialect};
use crate::resolve::{config_line, Resolved, Resolver};

use bundle::dedup_lines;

/// Resolve everything the virtual server `name` depends on.
pub fn dig_virtual(
    name: &str,
    body: &str,
    resolver: Resolver<'_>,
    dialect: &PatternDialect,
) -> AppBundle {
    tracing::debug!(vs = name, "digging virtual server");
    let vs = &dialect.virtual_server;
    let mut digger = Digger::new(name, resolver, dialect);
    digger.lines.push(config_line(["ltm", "virtual", name], body));

    let destination = vs.destination.extract(body).unwrap_or_default().to_string();

    if let Some(pool) = vs.pool.extract(body) {
        if let Some(key) = digger.dig_pool(pool) {
            digger.map.pools = digger.pool_members.get(key).cloned().unwrap_or_default();
        }
    }
    if let Some(names) = digger.feature_list("profiles", &vs.profiles, body) {
        digger.dig_profiles(&names);
    }
    if let Some(names) = digger.feature_list("rules", &vs.rules, body) {
        digger.dig_rules(&names);
    }
    if let Some(snat) = vs.snat.extract(body) {
        digger.dig_snat(snat);
    }
    if let Some(names) = digger.feature_list("policies", &vs.policies, body) {
        digger.dig_policies(&names);
    }
    if let Some(names) = digger.feature_list("persist", &vs.persist, body) {
        digger.dig_persistence(&names);
    }
    if let Some(fallback) = vs.fallback_persist.extract(body) {
        digger.dig_persistence(&[fallback]);
    }

    let Digger {
        lines,
        map,
        defaults,
        diagnostics,
        ..
    } = digger;
    if defaults.total() > 0 {
        tracing::debug!(
            vs = name,
            defaults = defaults.total(),
            "references assumed to be system defaults"
        );
    }

    AppBundle {
        name: name.to_string(),
        destination,
        config: dedup_lines(lines).concat(),
        map,
        defaults,
        diagnostics,
    }
}

/// Accumulated state of one dig. Lives for a single [`dig_virtual`] call.
struct Digger<'a> {
    vs: &'a str,
    resolver: Resolver<'a>,
    dialect: &'a PatternDialect,
    lines: Vec<String>,
    map: ReferenceMap,
    defaults: DefaultCounts,
    diagnostics: Vec<Diagnostic>,
    /// Members of every pool already dug, by stored key.
    pool_members: HashMap<&'a str, Vec<String>>,
}

impl<'a> Digger<'a> {
    fn new(vs: &'a str, resolver: Resolver<'a>, dialect: &'a PatternDialect) -> Self {
        Self {
            vs,
            resolver,
            dialect,
            lines: Vec::new(),
            map: ReferenceMap::default(),
            defaults: DefaultCounts::default(),
            diagnostics: Vec::new(),
            pool_members: HashMap::new(),
        }
    }

    /// Names listed in a block feature such as `profiles { ... }`.
    ///
    /// A present but empty block is reported and yields `None`.
    fn feature_list<'b>(
        &mut self,
        feature: &str,
        extractor: &Extractor,
        body: &'b str,
    ) -> Option<Vec<&'b str>> {
        let block = extractor.extract(body)?;
        let names = list_names(block);
        if names.is_empty() {
            tracing::debug!(vs = self.vs, feature, "feature block lists no names");
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::EmptyFeatureList,
                format!("{}: {feature} block lists no names", self.vs),
            ));
            return None;
        }
        Some(names)
    }

    fn emit(&mut self, found: &Resolved<'_>) {
        self.lines.push(found.to_config_line());
    }

    fn unresolved(&mut self, message: String) {
        tracing::warn!(vs = self.vs, "{message}");
        self.diagnostics
            .push(Diagnostic::new(DiagnosticKind::UnresolvedReference, message));
    }
}
