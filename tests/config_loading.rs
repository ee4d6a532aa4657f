//! Integration coverage for `.cstructinfo.toml` ancestor-directory config
//! loading and the `--with-graphs` attach/drop split, driven through the
//! built binary rather than unit-testing `cstructinfo::config` in isolation.

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

fn run_in(dir: &TempDir, file_name: &str, extra_args: &[&str]) -> Value {
    let mut cmd = Command::cargo_bin("cstructinfo").expect("binary builds");
    cmd.current_dir(dir.path());
    cmd.arg(file_name);
    cmd.args(extra_args);
    let output = cmd.output().expect("run cstructinfo");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is valid JSON")
}

#[test]
fn config_file_with_source_true_applies_without_the_cli_flag() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".cstructinfo.toml"), "with_source = true\n").unwrap();
    fs::write(
        dir.path().join("a.c"),
        "int f(void) { return 0; }\n",
    )
    .unwrap();

    let doc = run_in(&dir, "a.c", &[]);
    assert!(doc["functions"][0]["source"].as_str().unwrap().contains("return 0"));
}

#[test]
fn malformed_config_file_does_not_abort_the_run() {
    let dir = TempDir::new().unwrap();
    let mut f = fs::File::create(dir.path().join(".cstructinfo.toml")).unwrap();
    writeln!(f, "not valid toml :::").unwrap();
    fs::write(
        dir.path().join("a.c"),
        "int f(void) { return 0; }\n",
    )
    .unwrap();

    let doc = run_in(&dir, "a.c", &[]);
    assert_eq!(doc["functions"][0]["name"], "f");
}

#[test]
fn with_graphs_flag_attaches_flowchart_field() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("a.c"),
        "int f(void) { return 0; }\n",
    )
    .unwrap();

    let without = run_in(&dir, "a.c", &[]);
    assert!(without["functions"][0].get("flowchart").is_none());

    let with = run_in(&dir, "a.c", &["--with-graphs"]);
    assert!(with["functions"][0]["flowchart"]["vertices"].is_array());
}
