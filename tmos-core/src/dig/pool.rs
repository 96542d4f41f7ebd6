use crate::blocks::block_entries;
use crate::dialect::PatternDialect;
use crate::resolve::config_line;

use super::Digger;

impl<'a> Digger<'a> {
    /// Dig a pool with its nodes and monitors; returns the stored key when found.
    ///
    /// A pool already dug in this bundle is not emitted twice.
    pub(super) fn dig_pool(&mut self, name: &str) -> Option<&'a str> {
        let Some(found) = self.resolver.resolve("ltm pool", name) else {
            tracing::debug!(vs = self.vs, pool = name, "pool not in tree");
            self.defaults.pools += 1;
            return None;
        };
        let key = found.key();
        if self.pool_members.contains_key(key) {
            return Some(key);
        }
        tracing::debug!(vs = self.vs, pool = key, "digging pool");
        self.emit(&found);

        let dialect: &'a PatternDialect = self.dialect;
        let patterns = &dialect.pool;
        let mut members = Vec::new();
        if let Some(block) = patterns.members.extract(found.body) {
            for entry in block_entries(block) {
                if let Some(member) = self.dig_member(entry.name, entry.body) {
                    members.push(member);
                }
            }
        }
        self.pool_members.insert(key, members);

        if let Some(monitor) = patterns.monitor.extract(found.body) {
            for name in monitor_names(monitor, &patterns.monitor_min_of) {
                match self.resolver.resolve("ltm monitor", name) {
                    Some(found) => {
                        self.emit(&found);
                        self.map.monitors.insert(found.key().to_string());
                    }
                    None => {
                        tracing::debug!(pool = key, monitor = name, "default monitor");
                        self.defaults.monitors += 1;
                    }
                }
            }
        }

        Some(key)
    }

    /// Resolve a member's node and return its member-map entry.
    ///
    /// TMOS creates a node for every address member, so a member whose node has
    /// no record of its own gets one rebuilt from the member's address.
    fn dig_member(&mut self, member: &str, body: &str) -> Option<String> {
        let Some((node_name, port)) = split_member(member) else {
            tracing::debug!(vs = self.vs, member, "member without port");
            return None;
        };
        let dialect: &'a PatternDialect = self.dialect;
        let patterns = &dialect.pool;
        let node = self.resolver.resolve("ltm node", node_name);
        let fqdn = patterns.member_fqdn.is_match(body)
            || node.is_some_and(|found| patterns.member_fqdn.is_match(found.body));
        let address = if fqdn {
            None
        } else {
            first_capture(&patterns.member_address, body).or_else(|| {
                node.and_then(|found| first_capture(&patterns.member_address, found.body))
            })
        };

        match (node, address) {
            (Some(found), _) => {
                self.emit(&found);
                self.map.nodes.insert(found.key().to_string());
            }
            (None, Some(address)) => {
                tracing::debug!(vs = self.vs, node = node_name, "rebuilding implicit node");
                let body = format!("\n    address {address}\n");
                self.lines
                    .push(config_line(["ltm", "node", node_name], &body));
            }
            (None, None) => {
                tracing::debug!(vs = self.vs, node = node_name, "member node not in tree");
                self.defaults.nodes += 1;
            }
        }

        if fqdn {
            return Some(join_port(node_name, port));
        }
        match address {
            Some(address) => Some(join_port(address, port)),
            None => {
                tracing::debug!(vs = self.vs, member, "member without address");
                None
            }
        }
    }
}

/// Split a pool member name into node name and port.
///
/// IPv6 members separate the port with `.`, everything else with `:`.
pub fn split_member(member: &str) -> Option<(&str, &str)> {
    let short = member.rsplit('/').next().unwrap_or(member);
    let separator = if short.matches(':').count() > 1 { '.' } else { ':' };
    let (node, port) = member.rsplit_once(separator)?;
    (!node.is_empty() && !port.is_empty()).then_some((node, port))
}

fn join_port(address: &str, port: &str) -> String {
    if address.contains(':') {
        format!("{address}.{port}")
    } else {
        format!("{address}:{port}")
    }
}

fn first_capture<'t>(re: &regex::Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Monitor names from `a and b` or `min N of { a b }`.
fn monitor_names<'t>(monitor: &'t str, min_of: &regex::Regex) -> Vec<&'t str> {
    if let Some(list) = first_capture(min_of, monitor) {
        return list.split_whitespace().collect();
    }
    monitor
        .split(" and ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{join_port, monitor_names, split_member};
    use crate::dialect::base_dialect;

    #[test]
    fn splits_ipv4_and_named_members() {
        assert_eq!(
            split_member("/Common/node1:80"),
            Some(("/Common/node1", "80"))
        );
        assert_eq!(
            split_member("/Common/api.example.com:443"),
            Some(("/Common/api.example.com", "443"))
        );
        assert_eq!(split_member("10.0.0.1:http"), Some(("10.0.0.1", "http")));
    }

    #[test]
    fn splits_ipv6_member_on_dot() {
        assert_eq!(
            split_member("/Common/2001:db8::1.443"),
            Some(("/Common/2001:db8::1", "443"))
        );
        assert_eq!(join_port("2001:db8::1", "443"), "2001:db8::1.443");
    }

    #[test]
    fn member_without_port_is_rejected() {
        assert_eq!(split_member("/Common/node1"), None);
    }

    #[test]
    fn monitor_lists_in_both_forms() {
        let min_of = &base_dialect().pool.monitor_min_of;
        assert_eq!(
            monitor_names("/Common/http and /Common/app_http", min_of),
            vec!["/Common/http", "/Common/app_http"]
        );
        assert_eq!(
            monitor_names("min 1 of { /Common/http /Common/tcp }", min_of),
            vec!["/Common/http", "/Common/tcp"]
        );
        assert_eq!(monitor_names("/Common/tcp", min_of), vec!["/Common/tcp"]);
    }
}
