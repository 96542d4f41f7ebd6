use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn tmos_explode() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tmos-explode"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn apps_list_prints_virtual_servers() {
    tmos_explode()
        .arg("apps")
        .arg(fixture("fixtures/bigip.conf"))
        .arg("--list")
        .assert()
        .success()
        .stdout("/Common/app1_vs\n/Common/app2_vs\n/Tenant1/t1_vs\n");
}

#[test]
fn single_app_renders_bundle() {
    tmos_explode()
        .arg("apps")
        .arg(fixture("fixtures/bigip.conf"))
        .arg("--app")
        .arg("app1_vs")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "/Common/app1_vs -> /Common/192.168.1.10:443",
        ))
        .stdout(predicate::str::contains("ltm rule /Common/app1_rule {"))
        .stdout(predicate::str::contains("ltm snatpool /Common/app1_snat {"))
        .stdout(predicate::str::contains("app2_vs").not());
}

#[test]
fn apps_json_contains_reference_map() {
    let output = tmos_explode()
        .arg("apps")
        .arg(fixture("fixtures/bigip.conf"))
        .arg("--format")
        .arg("json")
        .output()
        .expect("run apps");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    let apps = json.as_array().expect("array of bundles");
    assert_eq!(apps.len(), 3);
    assert_eq!(apps[0]["name"], "/Common/app1_vs");
    assert_eq!(apps[0]["map"]["snat_pools"][0], "/Common/app1_snat");
    assert_eq!(apps[1]["diagnostics"][0]["kind"], "unresolved_reference");
}

#[test]
fn unknown_app_is_an_error() {
    tmos_explode()
        .arg("apps")
        .arg(fixture("fixtures/bigip.conf"))
        .arg("--app")
        .arg("nope_vs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no virtual server named nope_vs"));
}
