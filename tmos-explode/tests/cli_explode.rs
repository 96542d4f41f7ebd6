use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn explode_writes_report_file() {
    let dir = tempdir().expect("tempdir");
    let report_path = dir.path().join("report.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tmos-explode"));
    cmd.arg("explode")
        .arg(fixture("fixtures/bigip.conf"))
        .arg(fixture("fixtures/partition.conf"))
        .arg("--output")
        .arg(&report_path)
        .assert()
        .success();

    let contents = fs::read_to_string(&report_path).expect("report should be readable");
    let json: serde_json::Value = serde_json::from_str(&contents).expect("valid json");
    assert!(json["id"].is_string());
    assert_eq!(json["config"]["apps"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["stats"]["object_count"], 34);
    assert_eq!(json["stats"]["source_version"], "15.1.0.4");
    assert!(json["stats"]["app_time_ms"].as_f64().is_some_and(|ms| ms >= 0.0));

    let base = json["config"]["base"].as_str().expect("base text");
    assert!(base.starts_with("net vlan /Common/external {"));
    assert!(base.contains("auth partition Tenant1 {"));
}

#[test]
fn explode_uses_settings_override() {
    let dir = tempdir().expect("tempdir");
    let settings = dir.path().join("settings.toml");
    fs::write(
        &settings,
        "[base]\nobjects = [\"net self\"]\n\n[output]\npretty = false\n",
    )
    .expect("write settings");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tmos-explode"));
    let output = cmd
        .arg("--settings")
        .arg(&settings)
        .arg("explode")
        .arg(fixture("fixtures/bigip.conf"))
        .output()
        .expect("run explode");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.trim_end().lines().count(), 1);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    let base = json["config"]["base"].as_str().expect("base text");
    assert!(base.starts_with("net self "));
    assert!(!base.contains("net vlan"));
}

#[test]
fn explode_refuses_to_overwrite_config() {
    let dir = tempdir().expect("tempdir");
    let conf = dir.path().join("bigip.conf");
    fs::copy(fixture("fixtures/bigip.conf"), &conf).expect("copy fixture");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tmos-explode"));
    cmd.arg("explode")
        .arg(&conf)
        .arg("--output")
        .arg(&conf)
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite"));

    let contents = fs::read_to_string(&conf).expect("config still readable");
    assert!(contents.starts_with("#TMSH-VERSION"));
}

#[test]
fn explode_rejects_malformed_settings() {
    let dir = tempdir().expect("tempdir");
    let settings = dir.path().join("settings.toml");
    fs::write(&settings, "[base\nobjects = 1").expect("write settings");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tmos-explode"));
    cmd.arg("--settings")
        .arg(&settings)
        .arg("explode")
        .arg(fixture("fixtures/bigip.conf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load settings"));
}
