use super::Digger;

impl Digger<'_> {
    pub(super) fn dig_profiles(&mut self, names: &[&str]) {
        let scopes = self.dialect.profile_scopes;
        for &name in names {
            match self.resolver.resolve_any(scopes, name) {
                Some(found) => {
                    self.emit(&found);
                    self.map.profiles.insert(found.key().to_string());
                }
                None => {
                    tracing::debug!(vs = self.vs, profile = name, "default profile");
                    self.defaults.profiles += 1;
                }
            }
        }
    }

    /// Persistence and fallback persistence share one scope.
    pub(super) fn dig_persistence(&mut self, names: &[&str]) {
        for &name in names {
            match self.resolver.resolve("ltm persistence", name) {
                Some(found) => {
                    self.emit(&found);
                    self.map.persistence.insert(found.key().to_string());
                }
                None => {
                    tracing::debug!(vs = self.vs, persistence = name, "default persistence");
                    self.defaults.persistence += 1;
                }
            }
        }
    }
}
