use crate::pool_refs::pools_in_rule;

use super::Digger;

impl Digger<'_> {
    /// Emit each iRule and dig the pools its script selects.
    pub(super) fn dig_rules(&mut self, names: &[&str]) {
        let known_pools = self.resolver.keys("ltm pool");
        for &name in names {
            let Some(found) = self.resolver.resolve("ltm rule", name) else {
                tracing::debug!(vs = self.vs, rule = name, "default iRule");
                self.defaults.rules += 1;
                continue;
            };
            self.emit(&found);
            self.map.rules.insert(found.key().to_string());

            for reference in pools_in_rule(found.body, Some(known_pools.as_slice())) {
                tracing::debug!(
                    rule = found.key(),
                    pool = reference.pool(),
                    "iRule selects pool"
                );
                if let Some(key) = self.dig_pool(reference.pool()) {
                    self.map.rule_pools.insert(key.to_string());
                }
            }
        }
    }
}
