//! Integration tests for Trellis
//!
//! These tests drive the full pipeline through the library and the built binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;
use trellis_bundle::{analyze, resolve_snippet};
use trellis_core::{EngineConfig, LabelTable, parse_objects};

const ORDER_RT: &str = "aaaaaaaa-0000-4000-8000-000000000001";
const FIELD_STATUS: &str = "bbbbbbbb-0000-4000-8000-000000000001";
const CREATE_PM: &str = "cccccccc-0000-4000-8000-000000000001";
const FORM: &str = "_a-dddddddd-0000-4000-8000-000000000001_42";
const FORMAT_RULE: &str = "_a-dddddddd-0000-4000-8000-000000000002_43";
const TITLE_TEXT: &str = "eeeeeeee-0000-4000-8000-000000000001";
const STATUS_API: &str = "ffffffff-0000-4000-8000-000000000001";
const UNUSED: &str = "ffffffff-0000-4000-8000-000000000002";

/// A small exported application in the on-disk shape (`uuid`, `type`, `data`).
fn app_document() -> Value {
    json!({"objects": [
        {
            "uuid": ORDER_RT,
            "name": "Order",
            "type": "Record Type",
            "data": {
                "fields": [{"field_uuid": FIELD_STATUS, "field_name": "status"}],
                "actions": [{
                    "reference_key": "create",
                    "target_uuid": CREATE_PM,
                    "expressions": {"TITLE": "\"New Order\""}
                }]
            }
        },
        {
            "uuid": CREATE_PM,
            "name": "CreateOrder",
            "type": "Process Model",
            "data": {"nodes": [{"interface_uuid": FORM}]}
        },
        {
            "uuid": FORM,
            "name": "OrderForm",
            "type": "Interface",
            "data": {"sail_code": format!(
                "a!formLayout(label: #\"urn:appian:translation-string:v1:{TITLE_TEXT}\", \
                 contents: {{ #\"{FORMAT_RULE}\"(#\"urn:appian:record-field:v1:{ORDER_RT}/{FIELD_STATUS}\"), \
                 rule!Labels(bundleKey: \"form.submit\") }})"
            )}
        },
        {
            "uuid": FORMAT_RULE,
            "name": "FormatStatus",
            "type": "Expression Rule",
            "data": {"sail_code": "upper(ri!status)"}
        },
        {
            "uuid": TITLE_TEXT,
            "name": "order_title",
            "type": "Translation String",
            "data": {"translations": [
                {"locale": "en-US", "value": "Create an order"},
                {"locale": "fr-FR", "value": "Créer une commande"}
            ]}
        },
        {
            "uuid": STATUS_API,
            "name": "Status API",
            "type": "Web API",
            "data": {"sail_code": "rule!FormatStatus(\"open\")"}
        },
        {
            "uuid": UNUSED,
            "name": "Unused",
            "type": "Expression Rule",
            "data": {"sail_code": "1"}
        }
    ]})
}

/// Write the fixture application, a label file and a config into a temp dir.
fn write_workspace(config: &str) -> (TempDir, PathBuf, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("objects.json");
    let labels = dir.path().join("labels.properties");
    let config_path = dir.path().join("trellis.toml");
    fs::write(&input, serde_json::to_string_pretty(&app_document()).unwrap()).unwrap();
    fs::write(&labels, "# form labels\nform.submit = Submit\n").unwrap();
    fs::write(&config_path, config).unwrap();
    (dir, input, labels, config_path)
}

fn trellis(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trellis"))
        .args(args)
        .output()
        .expect("Failed to execute trellis")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ── Binary ──────────────────────────────────────────────────

#[test]
fn test_cli_help() {
    let output = trellis(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("resolve"));
}

#[test]
fn test_cli_version() {
    let output = trellis(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Trellis v"));
}

#[test]
fn test_analyze_writes_report() {
    let (dir, input, labels, config) = write_workspace("locale = \"fr-FR\"\n");
    let report_path = dir.path().join("report.json");

    let output = trellis(&[
        "analyze",
        "--input",
        path_arg(&input),
        "--labels",
        path_arg(&labels),
        "--config",
        path_arg(&config),
        "--output",
        path_arg(&report_path),
        "--include-objects",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["locale"], json!("fr-FR"));
    assert!(report["generated_at"].as_str().is_some());

    let bundle_ids: Vec<&str> = report["bundles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(bundle_ids, vec!["Order_-_New_Order", "Status_API"]);
    assert_eq!(report["assignments"][FORMAT_RULE], json!(["Order_-_New_Order", "Status_API"]));
    assert_eq!(report["summary"]["coverage"]["orphaned_count"], json!(2));

    let form = report["objects"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["id"] == json!(FORM))
        .unwrap();
    assert_eq!(
        form["attributes"]["sail_code"],
        json!("a!formLayout(label: \"Créer une commande\", contents: { rule!FormatStatus(recordType!Order.status), \"Submit\" })")
    );
}

#[test]
fn test_analyze_to_stdout_omits_objects() {
    let (_dir, input, _labels, _config) = write_workspace("");
    let output = trellis(&["analyze", "--input", path_arg(&input)]);
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report.get("objects").is_none());
    assert_eq!(report["summary"]["coverage"]["total_objects"], json!(7));
}

#[test]
fn test_resolve_command() {
    let (_dir, input, _labels, _config) = write_workspace("");
    let text = format!("#\"{FORMAT_RULE}\"(1) & #\"urn:appian:record-type:v1:{ORDER_RT}\"");
    let output = trellis(&["resolve", "--input", path_arg(&input), "--text", &text]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "rule!FormatStatus(1) & recordType!Order"
    );
}

#[test]
fn test_missing_input_fails_with_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");
    let output = trellis(&["analyze", "--input", path_arg(&missing)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.json"));
}

#[test]
fn test_invalid_config_fails() {
    let (_dir, input, _labels, config) = write_workspace("hub_threshold = \"lots\"");
    let output = trellis(&["analyze", "--input", path_arg(&input), "--config", path_arg(&config)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration"));
}

// ── Library pipeline ────────────────────────────────────────

fn fixture_objects() -> Vec<trellis_core::AppObject> {
    parse_objects(&app_document().to_string()).unwrap()
}

#[test]
fn test_pipeline_edges_and_entry_points() {
    let output = analyze(fixture_objects(), LabelTable::new(), &EngineConfig::default());

    let edges: Vec<(&str, &str, &str)> = output
        .edges
        .iter()
        .map(|e| (e.source_name.as_str(), e.target_name.as_str(), e.kind.as_str()))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("Order", "CreateOrder", "CALLS"),
            ("CreateOrder", "OrderForm", "CALLS"),
            ("OrderForm", "FormatStatus", "CALLS"),
            ("OrderForm", "Order", "USES_RECORD_TYPE"),
            ("Status API", "FormatStatus", "CALLS"),
        ]
    );

    let order_bundle = output.partition.bundle("Order_-_New_Order").unwrap();
    // Order is reached from the form, but as a stop type it adds nothing more.
    assert!(order_bundle.members.contains(ORDER_RT));
    assert_eq!(order_bundle.members.len(), 4);
    assert_eq!(output.partition.orphans, vec![TITLE_TEXT.to_string(), UNUSED.to_string()]);
}

#[test]
fn test_resolution_is_idempotent() {
    let objects = fixture_objects();
    let labels: LabelTable = [("form.submit", "Submit")].into_iter().collect();
    let config = EngineConfig::default();
    let text = format!(
        "#\"{FORMAT_RULE}\"(#\"urn:appian:record-field:v1:{ORDER_RT}/{FIELD_STATUS}\") & \
         #\"urn:appian:translation-string:v1:{TITLE_TEXT}\" & rule!L(bundleKey: \"form.submit\") & \
         #\"_a-99999999-0000-4000-8000-000000000000_1\""
    );

    let once = resolve_snippet(&objects, labels.clone(), &config, &text);
    let twice = resolve_snippet(&objects, labels, &config, &once);
    assert_eq!(
        once,
        "rule!FormatStatus(recordType!Order.status) & \"Create an order\" & \"Submit\" & \
         #\"_a-99999999-0000-4000-8000-000000000000_1\""
    );
    assert_eq!(once, twice);
}

#[test]
fn test_partition_is_deterministic_under_reordering() {
    let forward = analyze(fixture_objects(), LabelTable::new(), &EngineConfig::default());
    let mut reversed_objects = fixture_objects();
    reversed_objects.reverse();
    let reversed = analyze(reversed_objects, LabelTable::new(), &EngineConfig::default());

    let members = |output: &trellis_bundle::AnalysisOutput| {
        output
            .partition
            .bundles
            .iter()
            .map(|b| (b.id.clone(), b.members.clone()))
            .collect::<std::collections::BTreeMap<_, _>>()
    };
    assert_eq!(members(&forward), members(&reversed));
    assert_eq!(forward.report.bundles, reversed.report.bundles);
}
