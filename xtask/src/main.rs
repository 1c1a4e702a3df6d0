//! Developer tasks (schema generation, golden report updates, conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use authguard_test_util::normalize_nondeterministic;
use authguard_types::ids;
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Project root (parent of the xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("Cannot determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .context("xtask has no parent")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("tests").join("fixtures"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(authguard_types::AuthguardReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(authguard_settings::AuthguardConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "authguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "authguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Pretty-printed JSON with trailing newline.
fn serialize_json<T: serde::Serialize>(value: &T) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_json(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas/ matches what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_json(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate golden fixture reports against the report schema");
    eprintln!("  conform-full      Golden reports + authguard binary output on every fixture");
    eprintln!("  update-goldens    Rewrite existing expected.report.json files from binary output");
}

/// Every code a report may carry.
fn known_codes() -> [&'static str; 6] {
    [
        ids::CODE_COMPLIANT,
        ids::CODE_PUBLIC_NOT_DECLARED,
        ids::CODE_AUTHENTICATED_ON_PUBLIC,
        ids::CODE_AUTHENTICATION_MISSING,
        ids::CODE_POLICY_MISMATCH,
        ids::CODE_RUNTIME_ERROR,
    ]
}

/// No absolute paths, no `../`, forward slashes only.
fn is_clean_path(path: &str) -> bool {
    !(path.starts_with('/')
        || path.starts_with('\\')
        || path.contains("..")
        || path.contains('\\')
        // Windows drive letters like C:
        || (path.len() >= 2 && path.as_bytes()[1] == b':'))
}

fn compile_report_schema() -> anyhow::Result<jsonschema::Validator> {
    let schema = serde_json::to_value(generate_report_schema())?;
    jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile report schema: {}", e))
}

/// Schema, path and code hygiene for one report value.
fn report_errors(
    validator: &jsonschema::Validator,
    label: &str,
    value: &serde_json::Value,
) -> Vec<String> {
    let mut errors: Vec<String> = validator
        .iter_errors(value)
        .map(|err| format!("{}: schema validation: {}", label, err))
        .collect();

    let results = value
        .get("results")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();
    for (i, result) in results.iter().enumerate() {
        if let Some(path) = result
            .get("endpoint")
            .and_then(|e| e.get("source"))
            .and_then(|v| v.as_str())
            && !is_clean_path(path)
        {
            errors.push(format!(
                "{}: results[{}].endpoint.source '{}' is not clean",
                label, i, path
            ));
        }
        if let Some(code) = result.get("code").and_then(|v| v.as_str())
            && !known_codes().contains(&code)
        {
            errors.push(format!("{}: results[{}].code '{}' is unknown", label, i, code));
        }
    }

    errors
}

/// Fixture directories that carry an `authguard.toml`, sorted by name.
fn fixture_dirs() -> anyhow::Result<Vec<PathBuf>> {
    let dir = fixtures_dir()?;
    let mut out = Vec::new();
    for entry in fs::read_dir(&dir).context("Failed to read tests/fixtures/")? {
        let path = entry?.path();
        if path.is_dir() && path.join("authguard.toml").exists() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn fixture_name(dir: &Path) -> String {
    dir.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))
}

/// Validate every golden `expected.report.json` against the generated report schema.
fn conform() -> anyhow::Result<()> {
    let validator = compile_report_schema()?;
    println!("✓ authguard.report.v1 schema compiles");

    let mut golden_count = 0;
    let mut errors = Vec::new();

    for dir in fixture_dirs()? {
        let golden = dir.join("expected.report.json");
        if !golden.exists() {
            continue;
        }
        let name = fixture_name(&dir);
        let value = read_json(&golden)?;
        let found = report_errors(&validator, &name, &value);
        if found.is_empty() {
            println!("  ✓ {} golden report validates", name);
        }
        errors.extend(found);
        golden_count += 1;
    }

    if golden_count == 0 {
        bail!("No golden reports found in tests/fixtures/");
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} golden reports pass conformance checks!", golden_count);
    Ok(())
}

fn authguard_bin() -> anyhow::Result<PathBuf> {
    let bin = project_root()?.join("target").join("debug").join("authguard");

    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");

    if !bin.exists() {
        bail!(
            "authguard binary not found at {}.\n\
            Run `cargo build -p authguard-cli` first.",
            bin.display()
        );
    }
    Ok(bin)
}

/// Run `authguard check` on a fixture; returns the exit code and the written report.
fn run_fixture(bin: &Path, fixture_dir: &Path) -> anyhow::Result<(i32, serde_json::Value)> {
    let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
    let report_out = temp_dir.path().join("report.json");

    let output = std::process::Command::new(bin)
        .arg("--root")
        .arg(fixture_dir)
        .arg("check")
        .arg("--report-out")
        .arg(&report_out)
        .output()
        .with_context(|| format!("Failed to run authguard on {}", fixture_dir.display()))?;

    let code = output.status.code().unwrap_or(-1);
    if !report_out.exists() {
        bail!(
            "no report written (exit {}): {}",
            code,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok((code, read_json(&report_out)?))
}

/// Golden-report conformance plus validation of live binary output on every fixture.
fn conform_full() -> anyhow::Result<()> {
    conform()?;

    println!("\n--- Full conformance: authguard binary output ---\n");

    let validator = compile_report_schema()?;
    let bin = authguard_bin()?;
    let mut errors = Vec::new();

    for dir in fixture_dirs()? {
        let name = fixture_name(&dir);
        let (code, report) = match run_fixture(&bin, &dir) {
            Ok(run) => run,
            Err(err) => {
                errors.push(format!("fixture '{}': {:#}", name, err));
                continue;
            }
        };

        // 0 pass, 2 fail, 1 runtime error; anything else is a crash.
        if !matches!(code, 0..=2) {
            errors.push(format!("fixture '{}': unexpected exit code {}", name, code));
        }
        errors.extend(report_errors(&validator, &name, &report));

        let golden = dir.join("expected.report.json");
        if golden.exists() {
            let expected = normalize_nondeterministic(read_json(&golden)?);
            if normalize_nondeterministic(report) != expected {
                errors.push(format!(
                    "fixture '{}': output differs from golden file expected.report.json",
                    name
                ));
            } else {
                println!("  ✓ fixture '{}' matches golden report", name);
            }
        } else {
            println!("  ✓ fixture '{}' produces a valid report (exit {})", name, code);
        }
    }

    if !errors.is_empty() {
        eprintln!("\nFull conformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!(
            "Full conformance validation failed with {} errors",
            errors.len()
        );
    }

    println!("\n✓ Full conformance checks passed!");
    Ok(())
}

/// Rewrite existing golden reports from current binary output, normalized.
fn update_goldens() -> anyhow::Result<()> {
    let bin = authguard_bin()?;
    let mut updated = 0;

    for dir in fixture_dirs()? {
        let golden = dir.join("expected.report.json");
        if !golden.exists() {
            continue;
        }
        let (_, report) = run_fixture(&bin, &dir)
            .with_context(|| format!("fixture '{}'", fixture_name(&dir)))?;
        let json = serialize_json(&normalize_nondeterministic(report))?;
        fs::write(&golden, json)
            .with_context(|| format!("Failed to write {}", golden.display()))?;
        println!("Wrote {}", golden.display());
        updated += 1;
    }

    println!("\nUpdated {} golden reports.", updated);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "conform-full" => conform_full(),
        "update-goldens" => update_goldens(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
