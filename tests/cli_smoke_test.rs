//! CLI smoke tests: the binary runs end-to-end against a small fixture tree
//! and leaves the artifact behind.

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn write_fixture(root: &std::path::Path) {
    let docs = root.join("docs/v2/orderbook");
    fs::create_dir_all(&docs).unwrap();
    fs::write(
        docs.join("index.mdx"),
        "## orderbook {{label : 'orderbook', tag : 'API-v2'}}\n\n\
         <CodeGroup title=\"Orderbook\" tag=\"POST\" label=\"orderbook\">\n\
         ```json\n{\"method\": \"orderbook\", \"mmrpc\": \"2.0\"}\n```\n\
         </CodeGroup>\n",
    )
    .unwrap();
    fs::write(
        root.join("api_methods.json"),
        r#"{"v2": ["orderbook", "my_balance"]}"#,
    )
    .unwrap();
}

#[test]
fn map_writes_the_artifact_and_reports_coverage() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());

    let mut cmd = Command::cargo_bin("docmap").unwrap();
    let assert = cmd
        .arg("map")
        .arg(dir.path())
        .arg("--format")
        .arg("terminal")
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(output.contains("METHOD MAPPING SUMMARY"));
    assert!(output.contains("my_balance"));

    let artifact = dir.path().join("unified_method_mapping.json");
    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(artifact).unwrap()).unwrap();
    assert!(document["method_paths"]["v2"]["orderbook"]["has_docs"]
        .as_bool()
        .unwrap());
    assert_eq!(
        document["missing"]["methods_lacking_coverage"]["v2"][0],
        "my_balance"
    );
    // Totals are always stated, even when zero errors occurred.
    assert!(document["summary_statistics"]["diagnostics"]["total_errors"].is_u64());
}

#[test]
fn json_format_prints_the_report_document() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());

    let mut cmd = Command::cargo_bin("docmap").unwrap();
    let assert = cmd
        .arg("map")
        .arg(dir.path())
        .arg("--format")
        .arg("json")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let document: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(document["summary_statistics"]["total_methods"].as_u64().unwrap() >= 2);
}
