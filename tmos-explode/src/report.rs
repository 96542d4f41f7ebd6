use colored::Colorize;
use tmos_core::{AppBundle, Diagnostic, ParsedConfig};

/// Render parse statistics and parse-time diagnostics.
pub fn render_parse_summary(parsed: &ParsedConfig) -> String {
    let stats = parsed.stats();
    let selection = parsed.selection();
    let mut out = Vec::new();

    out.push(
        format!(
            "version={} dialect={} exact={}",
            parsed.version(),
            selection.dialect.name,
            selection.exact
        )
        .cyan()
        .to_string(),
    );
    out.push(format!(
        "files_parsed={} files_skipped={} objects={} parse_time_ms={:.3}",
        stats.files_parsed, stats.files_skipped, stats.object_count, stats.parse_time_ms
    ));
    for (kind, count) in &stats.objects {
        out.push(format!("- {kind}: {count}"));
    }
    if !parsed.diagnostics().is_empty() {
        out.push(String::new());
        out.push(render_diagnostics(parsed.diagnostics()));
    }
    out.join("\n")
}

/// Render diagnostics one per line.
pub fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|diag| diag.to_string().yellow().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one application bundle: header, reference summary, then its config.
pub fn render_bundle(bundle: &AppBundle) -> String {
    let map = &bundle.map;
    let mut out = Vec::new();

    out.push(
        format!("{} -> {}", bundle.name, display_or_dash(&bundle.destination))
            .bold()
            .green()
            .to_string(),
    );
    out.push(format!("  members: {}", join_or_dash(map.pools.iter())));
    for (label, names) in [
        ("nodes", &map.nodes),
        ("monitors", &map.monitors),
        ("profiles", &map.profiles),
        ("rules", &map.rules),
        ("rule_pools", &map.rule_pools),
        ("policies", &map.policies),
        ("policy_pools", &map.policy_pools),
        ("persistence", &map.persistence),
        ("snat_pools", &map.snat_pools),
    ] {
        if !names.is_empty() {
            out.push(format!("  {label}: {}", join_or_dash(names.iter())));
        }
    }
    out.push(format!("  defaults: {}", bundle.defaults.total()).dimmed().to_string());
    if !bundle.diagnostics.is_empty() {
        out.push(render_diagnostics(&bundle.diagnostics));
    }
    out.push(String::new());
    out.push(bundle.config.trim_end().to_string());
    out.join("\n")
}

/// Render application names, one per line.
pub fn render_app_list(parsed: &ParsedConfig) -> String {
    parsed
        .app_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn join_or_dash<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let joined = items.map(String::as_str).collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use tmos_core::{parse, ConfigFile};

    use super::{render_app_list, render_bundle, render_parse_summary};

    const CONF: &str = "#TMSH-VERSION: 15.1.0.4\n\
ltm node /Common/n1 {\n    address 10.0.0.11\n}\n\
ltm pool /Common/web_pool {\n    members {\n        /Common/n1:80 {\n            address 10.0.0.11\n        }\n    }\n}\n\
ltm virtual /Common/web_vs {\n    destination /Common/10.0.0.1:80\n    pool /Common/web_pool\n}\n";

    #[test]
    fn bundle_rendering_lists_members_and_config() {
        colored::control::set_override(false);
        let parsed = parse(&[ConfigFile::new("bigip.conf", CONF)]).expect("parse");
        let bundle = parsed.app("web_vs").expect("app");
        let text = render_bundle(&bundle);

        assert!(text.starts_with("/Common/web_vs -> /Common/10.0.0.1:80\n"));
        assert!(text.contains("  members: 10.0.0.11:80"));
        assert!(text.contains("  nodes: /Common/n1"));
        assert!(text.contains("ltm pool /Common/web_pool {"));
        assert!(!text.contains("  monitors:"));
    }

    #[test]
    fn summary_lists_object_counts() {
        colored::control::set_override(false);
        let parsed = parse(&[ConfigFile::new("bigip.conf", CONF)]).expect("parse");
        let text = render_parse_summary(&parsed);
        assert!(text.starts_with("version=15.1.0.4 dialect=tmos-base exact=true"));
        assert!(text.contains("- ltm pool: 1"));
        assert_eq!(render_app_list(&parsed), "/Common/web_vs");
    }
}
