use super::Digger;

impl Digger<'_> {
    /// Resolve the SNAT pool, if the translation uses one. Automap needs nothing.
    pub(super) fn dig_snat(&mut self, snat: &str) {
        if !snat.contains("pool") {
            tracing::debug!(vs = self.vs, "snat without pool, automap");
            return;
        }
        let name_pattern = &self.dialect.virtual_server.snat_pool_name;
        let Some(name) = name_pattern
            .captures(snat)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            self.unresolved(format!("{}: snat pool reference without a name", self.vs));
            return;
        };

        match self.resolver.resolve("ltm snatpool", name) {
            Some(found) => {
                self.emit(&found);
                self.map.snat_pools.insert(found.key().to_string());
            }
            None => self.unresolved(format!("{}: snat pool {name} not found", self.vs)),
        }
    }
}
