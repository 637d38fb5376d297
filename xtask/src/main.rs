//! Developer tasks (schema generation, explain coverage, report conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use licguard_test_util::normalize_nondeterministic;
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .context("xtask has no parent directory")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

/// Every emitted schema. Report schemas are named after the `schema` id they carry.
fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "licguard.report.v1.json",
            generate: || schema_for!(licguard_types::LicguardReport),
        },
        SchemaSpec {
            filename: "licguard.compat.v1.json",
            generate: || schema_for!(licguard_types::CompatReport),
        },
        SchemaSpec {
            filename: "licguard.obligations.v1.json",
            generate: || schema_for!(licguard_types::ObligationsReport),
        },
        SchemaSpec {
            filename: "licguard.batch.v1.json",
            generate: || schema_for!(licguard_types::BatchReport),
        },
        SchemaSpec {
            filename: "licguard.error.v1.json",
            generate: || schema_for!(licguard_types::ErrorReport),
        },
        SchemaSpec {
            filename: "licguard.config.v1.json",
            generate: || schema_for!(licguard_settings::LicguardConfigV1),
        },
        SchemaSpec {
            filename: "licguard.policy.v1.json",
            generate: || schema_for!(licguard_settings::PolicyFileV1),
        },
        SchemaSpec {
            filename: "licguard.batch-input.v1.json",
            generate: || schema_for!(licguard_settings::BatchFileV1),
        },
        SchemaSpec {
            filename: "licguard.license.v1.json",
            generate: || schema_for!(licguard_data::LicenseFile),
        },
        SchemaSpec {
            filename: "licguard.obligations-file.v1.json",
            generate: || schema_for!(licguard_data::ObligationsFile),
        },
        SchemaSpec {
            filename: "licguard.compatibility-file.v1.json",
            generate: || schema_for!(licguard_data::CompatibilityFile),
        },
        SchemaSpec {
            filename: "licguard.matrix-index.v1.json",
            generate: || schema_for!(licguard_data::MatrixIndex),
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("write schema {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas/ matches what would be generated (for CI).
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

        let expected = serialize_schema(&(spec.generate)())?;
        let actual =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
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
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Every documented code needs a non-empty title, description, and remediation.
fn explain_coverage() -> anyhow::Result<()> {
    let codes = licguard_types::explain::all_codes();
    let mut errors = Vec::new();

    for code in codes {
        match licguard_types::explain::lookup_explanation(code) {
            Some(exp) => {
                for (field, value) in [
                    ("title", exp.title),
                    ("description", exp.description),
                    ("remediation", exp.remediation),
                ] {
                    if value.trim().is_empty() {
                        errors.push(format!("Code '{code}' has empty {field}"));
                    }
                }
            }
            None => errors.push(format!("Code '{code}' has no explanation")),
        }
    }

    if errors.is_empty() {
        println!("✓ {} codes have explanations", codes.len());
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("Explain coverage failed with {} errors", errors.len())
    }
}

/// One CLI run against the fixture dataset.
struct Scenario {
    name: &'static str,
    args: &'static [&'static str],
    policies: &'static [&'static str],
    expected_exit: i32,
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "evaluate-permissive",
        args: &["evaluate", "MIT", "BSD-3-Clause"],
        policies: &[],
        expected_exit: 0,
    },
    Scenario {
        name: "evaluate-mobile-deny",
        args: &["evaluate", "MIT", "GPL-3.0", "--distribution", "mobile"],
        policies: &["mobile.toml"],
        expected_exit: 2,
    },
    Scenario {
        name: "compat-incompatible",
        args: &["compat", "MIT", "GPL-2.0", "Apache-2.0"],
        policies: &[],
        expected_exit: 2,
    },
    Scenario {
        name: "obligations-apache",
        args: &["obligations", "Apache-2.0", "BSD-3-Clause"],
        policies: &[],
        expected_exit: 0,
    },
    Scenario {
        name: "error-not-found",
        args: &["evaluate", "MIT", "WTFPL"],
        policies: &[],
        expected_exit: 1,
    },
];

/// Run the built binary over `SCENARIOS`, validate every report against the schema named by its
/// `schema` field, and compare with `tests/fixtures/golden/<name>.json` when present.
fn conform() -> anyhow::Result<()> {
    let root = project_root()?;
    let binary = root.join("target").join("debug").join("licguard");
    #[cfg(target_os = "windows")]
    let binary = binary.with_extension("exe");
    if !binary.exists() {
        bail!(
            "licguard binary not found at {}.\nRun `cargo build -p licguard-cli` first.",
            binary.display()
        );
    }

    let fixtures = root.join("tests").join("fixtures");
    let schemas = schemas_dir()?;
    let mut errors = Vec::new();

    for scenario in SCENARIOS {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let report_out = temp.path().join("report.json");

        let mut cmd = std::process::Command::new(&binary);
        cmd.current_dir(temp.path())
            .arg("--dataset")
            .arg(fixtures.join("dataset"));
        for policy in scenario.policies {
            cmd.arg("--policy").arg(fixtures.join("policies").join(policy));
        }
        let output = cmd
            .args(scenario.args)
            .arg("--report-out")
            .arg(&report_out)
            .output()
            .with_context(|| format!("run licguard for '{}'", scenario.name))?;

        if output.status.code() != Some(scenario.expected_exit) {
            errors.push(format!(
                "{}: exit {:?}, expected {}: {}",
                scenario.name,
                output.status.code(),
                scenario.expected_exit,
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let report = read_json(&report_out)?;
        let schema_id = report
            .get("schema")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let schema = read_json(&schemas.join(format!("{schema_id}.json")))
            .with_context(|| format!("no schema for '{schema_id}' (run `cargo xtask emit-schemas`)"))?;
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| anyhow::anyhow!("compile schema {schema_id}: {e}"))?;
        for err in validator.iter_errors(&report) {
            errors.push(format!("{}: schema validation: {err}", scenario.name));
        }

        let golden_path = fixtures.join("golden").join(format!("{}.json", scenario.name));
        if golden_path.exists() {
            let golden = normalize_nondeterministic(read_json(&golden_path)?);
            if normalize_nondeterministic(report) != golden {
                errors.push(format!("{}: output differs from {}", scenario.name, golden_path.display()));
                continue;
            }
            println!("  ✓ {} matches golden report", scenario.name);
        } else {
            println!("  ✓ {} validates against {schema_id} (no golden file)", scenario.name);
        }
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance failed with {} errors", errors.len());
    }

    println!("\n✓ All {} scenarios pass conformance checks!", SCENARIOS.len());
    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {} as JSON", path.display()))
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  explain-coverage  Validate all codes have explanations");
    eprintln!("  conform           Validate licguard reports against schemas/ and golden files");
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
        "explain-coverage" => explain_coverage(),
        "conform" => conform(),
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
