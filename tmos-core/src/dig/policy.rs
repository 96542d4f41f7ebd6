use crate::pool_refs::pools_in_policy;

use super::Digger;

impl Digger<'_> {
    /// Emit each policy and dig the pools its actions forward to.
    pub(super) fn dig_policies(&mut self, names: &[&str]) {
        for &name in names {
            let Some(found) = self.resolver.resolve("ltm policy", name) else {
                tracing::debug!(vs = self.vs, policy = name, "policy not in tree");
                self.defaults.policies += 1;
                continue;
            };
            self.emit(&found);
            self.map.policies.insert(found.key().to_string());

            for pool in pools_in_policy(found.body) {
                match self.dig_pool(&pool) {
                    Some(key) => {
                        self.map.policy_pools.insert(key.to_string());
                    }
                    None => self.unresolved(format!(
                        "{}: policy {} forwards to missing pool {pool}",
                        self.vs,
                        found.key()
                    )),
                }
            }
        }
    }
}
