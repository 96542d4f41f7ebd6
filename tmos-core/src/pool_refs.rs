//! Pool references inside iRules and local traffic policies.
//!
//! Both scanners are line based: a reference counts only when `pool` is the
//! first word on its line. iRule references may select a member
//! (`pool web member 10.0.0.1 80`) or go through a variable
//! (`pool $target` after `set target web_pool`).

use serde::Serialize;

use crate::index::names_match;

/// A pool referenced from an iRule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PoolReference {
    Pool(String),
    /// `pool <name> member <addr> [<port>]`, kept token by token.
    Member(Vec<String>),
}

impl PoolReference {
    pub fn pool(&self) -> &str {
        match self {
            PoolReference::Pool(name) => name,
            PoolReference::Member(tokens) => {
                tokens.first().map(String::as_str).unwrap_or_default()
            }
        }
    }
}

/// Pool references in an iRule, in order of first appearance.
///
/// With `known_pools`, only references naming one of those pools (partition
/// tolerant) are returned.
pub fn pools_in_rule(rule: &str, known_pools: Option<&[&str]>) -> Vec<PoolReference> {
    let lines: Vec<&str> = rule.lines().map(str::trim).collect();
    let mut found: Vec<PoolReference> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(rest) = pool_statement(line) else {
            continue;
        };
        let tokens: Vec<&str> = rest
            .split_whitespace()
            .map(|token| token.trim_end_matches([';', '}']))
            .take_while(|token| !token.is_empty() && !token.starts_with('#'))
            .collect();
        let Some(&first) = tokens.first() else {
            continue;
        };

        let name = match variable_name(first) {
            Some(var) => match assignment(&lines, idx, var) {
                Some(value) => value,
                None => {
                    tracing::debug!(var, "pool variable has no literal assignment");
                    continue;
                }
            },
            None if first.starts_with('[') => continue,
            None => first,
        };

        if let Some(known) = known_pools {
            if !known.iter().any(|pool| names_match(name, pool)) {
                tracing::debug!(pool = name, "iRule pool not in known pools");
                continue;
            }
        }

        let reference = if tokens.len() > 1 && tokens[1] == "member" {
            let mut member = vec![name.to_string()];
            member.extend(tokens[1..].iter().map(|token| (*token).to_string()));
            PoolReference::Member(member)
        } else {
            PoolReference::Pool(name.to_string())
        };
        if !found.contains(&reference) {
            found.push(reference);
        }
    }

    found
}

/// Pool names selected by a local traffic policy's actions.
pub fn pools_in_policy(policy: &str) -> Vec<String> {
    let mut pools: Vec<String> = Vec::new();
    for line in policy.lines().map(str::trim) {
        let Some(name) = pool_statement(line).and_then(|rest| rest.split_whitespace().next())
        else {
            continue;
        };
        let name = name.trim_end_matches('}');
        if !name.is_empty() && !pools.iter().any(|pool| pool == name) {
            pools.push(name.to_string());
        }
    }
    pools
}

fn pool_statement(line: &str) -> Option<&str> {
    if line.starts_with('#') {
        return None;
    }
    line.strip_prefix("pool ").map(str::trim_start)
}

/// `$var` or `${var}` to `var`.
fn variable_name(token: &str) -> Option<&str> {
    let var = token.strip_prefix('$')?;
    let var = var
        .strip_prefix('{')
        .map(|inner| inner.trim_end_matches('}'))
        .unwrap_or(var);
    (!var.is_empty()).then_some(var)
}

/// Literal value of `set <var> <value>`: the nearest assignment above `line`,
/// otherwise the last one anywhere in the script.
fn assignment<'a>(lines: &[&'a str], line: usize, var: &str) -> Option<&'a str> {
    let value_of = |text: &'a str| -> Option<&'a str> {
        if text.starts_with('#') {
            return None;
        }
        let mut words = text.strip_prefix("set ")?.split_whitespace();
        if words.next()? != var {
            return None;
        }
        let value = words.next()?.trim_end_matches([';', '}']).trim_matches('"');
        (!value.is_empty() && !value.starts_with('[') && !value.starts_with('$')).then_some(value)
    };

    lines[..line]
        .iter()
        .copied()
        .rev()
        .find_map(value_of)
        .or_else(|| lines.iter().copied().rev().find_map(value_of))
}
