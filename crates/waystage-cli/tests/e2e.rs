use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use waystage_core::{
    Condition, Datasources, EdgeBasedNodeId, EdgeId, Modifier, NodeId, NodeMapping, SegmentData,
    SegmentEntry, TimeSpan, TurnRestriction, Weekday,
};

fn waystage() -> Command {
    Command::new(env!("CARGO_BIN_EXE_waystage"))
}

fn run_ok(cwd: &Path, args: &[&str]) -> Output {
    let out = waystage()
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("run waystage");
    assert!(
        out.status.success(),
        "expected success\nargs={args:?}\nstatus={}\nstdout={}\nstderr={}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr),
    );
    out
}

fn run_err(cwd: &Path, args: &[&str]) -> Output {
    let out = waystage()
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("run waystage");
    assert!(
        !out.status.success(),
        "expected failure\nargs={args:?}\nstatus={}\nstdout={}\nstderr={}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr),
    );
    out
}

fn run_ok_json(cwd: &Path, args: &[&str]) -> Value {
    let out = run_ok(cwd, args);
    serde_json::from_slice(&out.stdout).expect("stdout is valid JSON")
}

fn write_fixtures(dir: &Path) {
    let mappings: Vec<NodeMapping> = (0..3)
        .map(|i| NodeMapping::new(NodeId(i), EdgeBasedNodeId(i * 2)))
        .collect();
    waystage_format::write_node_mappings(dir.join("map.nbg_to_ebg"), &mappings).unwrap();

    let mut sources = Datasources::default();
    sources.set_name(1, "traffic.csv").unwrap();
    waystage_format::write_datasources(dir.join("map.datasource_names"), &sources).unwrap();

    let mut segments = SegmentData::new(vec![0]);
    segments.push(SegmentEntry {
        node: NodeId(4),
        fwd_weight: 10,
        rev_weight: 11,
        fwd_duration: 12,
        rev_duration: 13,
        datasource: 1,
    });
    waystage_format::write_segment_data(dir.join("map.geometry"), &segments).unwrap();

    let restrictions = vec![
        TurnRestriction::new(NodeId(10), EdgeId(20), EdgeId(30), true).with_condition(Condition {
            modifier: Modifier::Closed,
            times: vec![TimeSpan::new(6, 9)],
            weekdays: vec![Weekday(1), Weekday(3), Weekday(5)],
            monthdays: vec![],
        }),
        TurnRestriction::new(NodeId(1), EdgeId(2), EdgeId(3), false),
    ];
    waystage_format::write_turn_restrictions(dir.join("map.restrictions"), &restrictions)
        .unwrap();
}

#[test]
fn validate_accepts_every_kind() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    for (kind, file) in [
        ("node-mapping", "map.nbg_to_ebg"),
        ("datasources", "map.datasource_names"),
        ("segment-data", "map.geometry"),
        ("turn-restrictions", "map.restrictions"),
    ] {
        let out = run_ok(dir.path(), &["validate", "--kind", kind, file]);
        assert_eq!(
            String::from_utf8_lossy(&out.stdout).trim(),
            format!("OK: {file}")
        );
    }
}

#[test]
fn validate_reports_corrupt_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let path = dir.path().join("map.restrictions");
    let mut bytes = std::fs::read(&path).unwrap();
    bytes[0] ^= 0x01;
    std::fs::write(&path, bytes).unwrap();

    let out = run_err(
        dir.path(),
        &["validate", "--kind", "turn-restrictions", "map.restrictions"],
    );
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("INVALID: map.restrictions"), "{stderr}");
    assert!(stderr.contains("fingerprint mismatch"), "{stderr}");

    let out = run_err(
        dir.path(),
        &[
            "--json",
            "validate",
            "--kind",
            "turn-restrictions",
            "map.restrictions",
        ],
    );
    let v: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["ok"], false);
    assert_eq!(v["kind"], "turn-restrictions");
}

#[test]
fn single_verbose_flag_shows_debug_log() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let out = waystage()
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .args(["-v", "validate", "--kind", "node-mapping", "map.nbg_to_ebg"])
        .output()
        .expect("run waystage");
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("opened"), "{stderr}");
}

#[test]
fn validate_rejects_wrong_kind() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    // Segment data has no fingerprint, so reading it as node mappings fails.
    run_err(dir.path(), &["validate", "--kind", "node-mapping", "map.geometry"]);
}

#[test]
fn inspect_restrictions_json() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let v = run_ok_json(
        dir.path(),
        &[
            "inspect",
            "--json",
            "--kind",
            "turn-restrictions",
            "map.restrictions",
        ],
    );
    assert_eq!(v["kind"], "turn-restrictions");
    assert_eq!(v["contents"], "turn_restrictions");
    assert_eq!(v["count"], 2);
    assert_eq!(v["only_count"], 1);
    assert_eq!(v["conditional_count"], 1);
    assert_eq!(v["format_version"], "1.0.0");
    assert_eq!(v["first"][0]["via"], 10);
    assert_eq!(v["first"][0]["conditions"][0]["weekdays"], serde_json::json!([1, 3, 5]));
}

#[test]
fn inspect_segment_data_and_datasources() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let v = run_ok_json(
        dir.path(),
        &["--json", "inspect", "--kind", "segment-data", "map.geometry"],
    );
    assert_eq!(v["segment_count"], 1);
    assert_eq!(v["index_count"], 1);
    assert!(v["format_version"].is_null());
    assert_eq!(v["first"][0]["fwd_weight"], 10);

    let v = run_ok_json(
        dir.path(),
        &["--json", "inspect", "--kind", "datasources", "map.datasource_names"],
    );
    assert_eq!(v["named"][1]["name"], "traffic.csv");

    let out = run_ok(
        dir.path(),
        &["inspect", "--kind", "node-mapping", "--limit", "1", "map.nbg_to_ebg"],
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("NodeMappings: count=3"), "{stdout}");
    assert!(stdout.contains("[0] node_based=0 edge_based=0"), "{stdout}");
    assert!(!stdout.contains("[1]"), "{stdout}");
}
