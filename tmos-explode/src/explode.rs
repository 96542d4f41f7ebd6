use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tmos_core::{AppBundle, Diagnostic, ParseStats, ParsedConfig, SourceInfo};
use uuid::Uuid;

/// Aggregate report for one parse pass: every application plus infrastructure.
#[derive(Debug, Clone, Serialize)]
pub struct ExplodeReport {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    pub config: ExplodedConfig,
    pub stats: ExplodeStats,
    /// Parse diagnostics followed by each application's, in app order.
    pub logs: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplodedConfig {
    pub sources: Vec<SourceInfo>,
    pub apps: Vec<AppBundle>,
    /// Infrastructure objects, one reconstituted object per line.
    pub base: String,
}

/// Parse stats plus the timings of the explode pass itself.
#[derive(Debug, Clone, Serialize)]
pub struct ExplodeStats {
    pub source_version: String,
    /// Digging every application.
    pub app_time_ms: f64,
    /// Base objects, sources and logs assembled into the report.
    pub pack_time_ms: f64,
    /// Parse, dig and pack together.
    pub total_time_ms: f64,
    #[serde(flatten)]
    pub parse: ParseStats,
}

/// Dig every application and collect the base objects of `base_kinds`.
pub fn explode(parsed: &ParsedConfig, base_kinds: &[&str]) -> ExplodeReport {
    let dig_started = Instant::now();
    let apps = parsed.apps();
    let app_time_ms = elapsed_ms(dig_started);

    let pack_started = Instant::now();
    let logs = parsed
        .diagnostics()
        .iter()
        .chain(apps.iter().flat_map(|app| app.diagnostics.iter()))
        .cloned()
        .collect();
    let config = ExplodedConfig {
        sources: parsed.sources().to_vec(),
        apps,
        base: parsed.base_config(base_kinds),
    };
    let pack_time_ms = elapsed_ms(pack_started);

    let parse = parsed.stats().clone();
    tracing::debug!(app_time_ms, pack_time_ms, apps = config.apps.len(), "exploded");

    ExplodeReport {
        id: Uuid::new_v4(),
        date_time: Utc::now(),
        config,
        stats: ExplodeStats {
            source_version: parsed.version().to_string(),
            app_time_ms,
            pack_time_ms,
            total_time_ms: parse.parse_time_ms + app_time_ms + pack_time_ms,
            parse,
        },
        logs,
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use tmos_core::{parse, ConfigFile};

    use super::explode;

    const CONF: &str = "#TMSH-VERSION: 15.1.0.4\n\
ltm virtual /Common/web_vs {\n    destination /Common/10.0.0.1:80\n    pool /Common/web_pool\n}\n\
net vlan /Common/internal {\n    tag 4094\n}\n";

    #[test]
    fn report_envelope_has_sources_apps_and_base() {
        let parsed = parse(&[ConfigFile::new("bigip.conf", CONF)]).expect("parse");
        let report = explode(&parsed, &["net vlan"]);

        assert_eq!(report.config.sources[0].file_name, "bigip.conf");
        assert_eq!(report.config.apps.len(), 1);
        assert_eq!(report.config.apps[0].defaults.pools, 1);
        assert_eq!(report.config.base, "net vlan /Common/internal {\n    tag 4094\n}\n");
        assert_eq!(report.stats.parse.object_count, 2);

        let json = serde_json::to_value(&report).expect("json");
        assert!(json["id"].is_string());
        assert!(json["date_time"].is_string());
        assert_eq!(json["config"]["apps"][0]["name"], "/Common/web_vs");
        assert_eq!(json["stats"]["object_count"], 2);
    }

    #[test]
    fn report_stats_carry_version_and_timings() {
        let parsed = parse(&[ConfigFile::new("bigip.conf", CONF)]).expect("parse");
        let report = explode(&parsed, &["net vlan"]);
        let stats = &report.stats;

        assert_eq!(stats.source_version, "15.1.0.4");
        assert!(stats.app_time_ms >= 0.0);
        assert!(stats.pack_time_ms >= 0.0);
        assert!(stats.total_time_ms >= stats.parse.parse_time_ms);
        assert!(stats.total_time_ms >= stats.app_time_ms + stats.pack_time_ms);

        let json = serde_json::to_value(&report).expect("json");
        for field in ["source_version", "app_time_ms", "pack_time_ms", "total_time_ms", "parse_time_ms"] {
            assert!(!json["stats"][field].is_null(), "{field}");
        }
    }

    #[test]
    fn each_report_gets_a_fresh_id() {
        let parsed = parse(&[ConfigFile::new("bigip.conf", CONF)]).expect("parse");
        assert_ne!(explode(&parsed, &[]).id, explode(&parsed, &[]).id);
    }
}
