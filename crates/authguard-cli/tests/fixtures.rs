//! End-to-end CLI integration tests using test fixtures.
//!
//! Each fixture in `tests/fixtures/` contains:
//! - An `authguard.toml`
//! - One or more endpoint catalog files
//! - Optionally an `expected.report.json` (timestamps and tool version use placeholders)
//!
//! These tests run the CLI against each fixture and verify:
//! 1. Exit code matches expected (0=pass, 2=fail, 1=error)
//! 2. JSON output matches the golden report, or carries the expected fields

use assert_cmd::Command;
use authguard_test_util::normalize_nondeterministic;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

/// Wraps the deprecated cargo_bin to centralize the deprecation warning.
#[allow(deprecated)]
fn authguard_cmd() -> Command {
    Command::cargo_bin("authguard").expect("authguard binary not found - run `cargo build` first")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("authguard-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

/// Run `check` against a fixture and return the exit code and JSON report.
fn run_check_on_fixture(fixture_name: &str) -> (i32, Value) {
    let fixture_path = fixtures_dir().join(fixture_name);
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    let output = authguard_cmd()
        .arg("--root")
        .arg(&fixture_path)
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .output()
        .expect("Failed to run command");

    let exit_code = output.status.code().unwrap_or(-1);
    let report_content = std::fs::read_to_string(&report_path).expect("Failed to read report");
    let report: Value = serde_json::from_str(&report_content).expect("Failed to parse report JSON");

    (exit_code, report)
}

fn load_expected_report(fixture_name: &str) -> Value {
    let expected_path = fixtures_dir()
        .join(fixture_name)
        .join("expected.report.json");
    let content = std::fs::read_to_string(&expected_path).expect("Failed to read expected report");
    serde_json::from_str(&content).expect("Failed to parse expected report")
}

fn assert_reports_match(actual: Value, expected: Value, fixture_name: &str) {
    let actual_normalized = normalize_nondeterministic(actual);
    let expected_normalized = normalize_nondeterministic(expected);

    assert_eq!(
        actual_normalized,
        expected_normalized,
        "Report mismatch for fixture '{}'.\n\nActual:\n{}\n\nExpected:\n{}",
        fixture_name,
        serde_json::to_string_pretty(&actual_normalized).unwrap(),
        serde_json::to_string_pretty(&expected_normalized).unwrap()
    );
}

fn codes(report: &Value) -> Vec<&str> {
    report["results"]
        .as_array()
        .expect("results should be array")
        .iter()
        .map(|r| r["code"].as_str().unwrap())
        .collect()
}

// ============================================================================
// Fixture tests
// ============================================================================

#[test]
fn fixture_compliant_passes() {
    let (exit_code, report) = run_check_on_fixture("compliant");
    let expected = load_expected_report("compliant");

    assert_eq!(exit_code, 0, "compliant fixture should exit with 0 (pass)");
    assert_reports_match(report, expected, "compliant");
}

#[test]
fn fixture_policy_mismatch_fails() {
    let (exit_code, report) = run_check_on_fixture("policy_mismatch");
    let expected = load_expected_report("policy_mismatch");

    assert_eq!(
        exit_code, 2,
        "policy_mismatch fixture should exit with 2 (fail)"
    );
    assert_reports_match(report, expected, "policy_mismatch");
}

#[test]
fn fixture_excluded_groups_are_never_validated() {
    let (exit_code, report) = run_check_on_fixture("excluded_groups");

    assert_eq!(exit_code, 0);
    assert_eq!(report["summary"]["total"], 2);
    assert_eq!(report["data"]["endpoints_discovered"], 3);
    assert_eq!(report["data"]["endpoints_excluded"], 1);
    let groups: Vec<&str> = report["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["endpoint"]["group"].as_str().unwrap())
        .collect();
    assert!(groups.iter().all(|g| !g.contains("ExcludedFromValidation")));
}

#[test]
fn fixture_overloads_resolve_by_parameter_list() {
    let (exit_code, report) = run_check_on_fixture("overloads");

    assert_eq!(exit_code, 0);
    assert_eq!(codes(&report), vec!["compliant"; 4]);

    let results = report["results"].as_array().unwrap();
    let get = results
        .iter()
        .find(|r| r["endpoint"]["member"] == "Get" && r["endpoint"]["parameters"] == Value::Array(vec![]))
        .expect("parameterless Get");
    assert_eq!(get["expected"]["kind"], "public");

    let put = results
        .iter()
        .find(|r| {
            r["endpoint"]["member"] == "Put"
                && r["endpoint"]["parameters"].as_array().map(Vec::len) == Some(2)
        })
        .expect("two-argument Put");
    assert_eq!(put["expected"]["policy"], "Writer");
    assert_eq!(
        put["message"],
        "ProductsController.Put(int id, ProductModel product)\n  required: [RequireAuthenticated (policy = Writer)]"
    );
}

#[test]
fn fixture_duplicate_group_names_are_distinct_groups() {
    let (exit_code, report) = run_check_on_fixture("duplicate_group_names");

    assert_eq!(exit_code, 0);
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    // Same display name; the expected policy follows the group path.
    assert_eq!(results[0]["endpoint"]["group"], "Portal.Public.HomeController");
    assert_eq!(results[0]["expected"]["kind"], "public");
    assert_eq!(results[1]["endpoint"]["group"], "Portal.Admin.HomeController");
    assert_eq!(results[1]["expected"]["policy"], "Admin");
}

#[test]
fn fixture_missing_default_is_a_runtime_error() {
    let (exit_code, report) = run_check_on_fixture("missing_default");

    assert_eq!(exit_code, 1);
    assert_eq!(report["verdict"], "fail");
    assert_eq!(report["error"]["check_id"], "tool.runtime");
    assert_eq!(report["error"]["code"], "runtime_error");
    assert!(
        report["error"]["message"]
            .as_str()
            .unwrap()
            .contains("no default policy was set")
    );
    assert_eq!(report["results"], Value::Array(vec![]));
}

#[test]
fn fixture_no_endpoints_is_a_runtime_error() {
    let (exit_code, report) = run_check_on_fixture("no_endpoints");

    assert_eq!(exit_code, 1);
    assert!(
        report["error"]["message"]
            .as_str()
            .unwrap()
            .contains("could not find any endpoints in scope 'EmptyService'")
    );
}

#[test]
fn fixture_results_are_sorted_by_message() {
    let (_, report) = run_check_on_fixture("policy_mismatch");
    let messages: Vec<&str> = report["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["message"].as_str().unwrap())
        .collect();
    let mut sorted = messages.clone();
    sorted.sort();
    assert_eq!(messages, sorted);
}

// ============================================================================
// CLI behavior tests
// ============================================================================

#[test]
fn check_command_creates_output_file() {
    let fixture_path = fixtures_dir().join("compliant");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("subdir").join("report.json");

    authguard_cmd()
        .arg("--root")
        .arg(&fixture_path)
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .success();

    assert!(report_path.exists(), "Report file should be created");
}

#[test]
fn check_with_markdown_output() {
    let fixture_path = fixtures_dir().join("policy_mismatch");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");
    let md_path = temp_dir.path().join("report.md");

    authguard_cmd()
        .arg("--root")
        .arg(&fixture_path)
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .arg("--write-markdown")
        .arg("--markdown-out")
        .arg(&md_path)
        .assert()
        .code(2);

    let md_content =
        std::fs::read_to_string(&md_path).expect("failed to read generated markdown file");
    assert!(md_content.starts_with("# Authguard report"));
    assert!(md_content.contains("AccountsController.Delete(int id)"));
    assert!(md_content.contains("actual: [RequireAuthenticated (policy = WrongPolicy)]"));
}

#[test]
fn check_print_lists_every_verdict() {
    let fixture_path = fixtures_dir().join("policy_mismatch");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    authguard_cmd()
        .arg("--root")
        .arg(&fixture_path)
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .arg("--print")
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with(
            "There are 3 endpoints validated; of which 1 passed, and 2 failed.",
        ))
        .stdout(predicate::str::contains("Scope under test: WebApi"))
        .stdout(predicate::str::contains(" - Default policy name: not set"))
        .stdout(predicate::str::contains("Failed : AccountsController.Index()"))
        .stdout(predicate::str::contains("Passed : AccountsController.List()"))
        .stdout(predicate::str::ends_with("- the End - \n"));
}

#[test]
fn check_reports_numbered_failures_on_stderr() {
    let fixture_path = fixtures_dir().join("policy_mismatch");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    authguard_cmd()
        .arg("--root")
        .arg(&fixture_path)
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "found 2 endpoint(s) not exposing the required access policy",
        ))
        .stderr(predicate::str::contains(
            "--- 2 validation errors described below ---",
        ))
        .stderr(predicate::str::contains(" (1) AccountsController.Delete(int id)"))
        .stderr(predicate::str::contains(" (2) AccountsController.Index()"))
        .stderr(predicate::str::contains("--- end of validation errors ---"));
}

#[test]
fn passing_check_prints_no_failure_list() {
    let fixture_path = fixtures_dir().join("compliant");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    authguard_cmd()
        .arg("--root")
        .arg(&fixture_path)
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("validation errors").not());
}

#[test]
fn scope_override_replaces_config_scope() {
    let fixture_path = fixtures_dir().join("compliant");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    authguard_cmd()
        .arg("--root")
        .arg(&fixture_path)
        .arg("--scope")
        .arg("WebApi.Staging")
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .success();

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["data"]["scope"], "WebApi.Staging");
}

#[test]
fn missing_config_is_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    authguard_cmd()
        .arg("--root")
        .arg(temp_dir.path())
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("authguard error: read config"));

    assert!(report_path.exists(), "Runtime error report should be written");
}

#[test]
fn md_command_renders_from_report() {
    let fixture_path = fixtures_dir().join("policy_mismatch");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    authguard_cmd()
        .arg("--root")
        .arg(&fixture_path)
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .code(2);

    authguard_cmd()
        .arg("md")
        .arg("--report")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Authguard report"))
        .stdout(predicate::str::contains("authenticated_on_public"));
}

#[test]
fn annotations_command_emits_github_errors() {
    let fixture_path = fixtures_dir().join("policy_mismatch");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    authguard_cmd()
        .arg("--root")
        .arg(&fixture_path)
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .code(2);

    let output = authguard_cmd()
        .arg("annotations")
        .arg("--report")
        .arg(&report_path)
        .arg("--max")
        .arg("1")
        .output()
        .expect("run annotations");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(
        "::error file=endpoints/accounts.toml::[auth.endpoint_policy:policy_mismatch]"
    ));
}

#[test]
fn print_command_matches_check_listing() {
    let fixture_path = fixtures_dir().join("compliant");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    let check = authguard_cmd()
        .arg("--root")
        .arg(&fixture_path)
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .arg("--print")
        .output()
        .expect("run check");
    assert!(check.status.success());

    let print = authguard_cmd()
        .arg("print")
        .arg("--report")
        .arg(&report_path)
        .output()
        .expect("run print");
    assert!(print.status.success());
    assert_eq!(
        String::from_utf8_lossy(&print.stdout),
        String::from_utf8_lossy(&check.stdout)
    );
}

#[test]
fn md_command_rejects_foreign_report() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");
    std::fs::write(&report_path, r#"{"schema":"depguard.report.v1"}"#).unwrap();

    authguard_cmd()
        .arg("md")
        .arg("--report")
        .arg(&report_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown report schema"));
}
