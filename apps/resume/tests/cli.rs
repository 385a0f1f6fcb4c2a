use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

/// Runs the binary from an empty scratch directory with configuration
/// variables cleared, so a developer's `.env` or shell never leaks in.
fn cmd(cwd: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_resume")));
    cmd.current_dir(cwd.path())
        .env_remove("RESUME_DATA")
        .env_remove("RESUME_OUTPUT")
        .env_remove("RENDER_TIMEOUT_SECS")
        .env_remove("DEBUG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

// -- validate --

#[test]
fn validate_minimal_document_succeeds() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["validate", "--data", &fixture_path("minimal.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Validating personal information..."))
        .stdout(predicate::str::contains("Professional experience validated (1 entries)"))
        .stdout(predicate::str::contains(
            "All validation checks passed for PDF generation!",
        ));
}

#[test]
fn validate_empty_experience_exits_one() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["validate", "--data", &fixture_path("empty_experience.json")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "❌ ERROR: Array must have at least 1 item(s): Experience Array (path: experience), found 0",
        ))
        .stdout(predicate::str::contains("All validation checks passed").not());
}

#[test]
fn validate_strict_profile_requires_summary() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args([
            "validate",
            "--profile",
            "strict",
            "--data",
            &fixture_path("minimal.json"),
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Professional Summary"));
}

#[test]
fn validate_missing_file_exits_two() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["validate", "--data", "nowhere.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Resume file not found at nowhere.json"));
}

#[test]
fn validate_reads_data_path_from_env() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .env("RESUME_DATA", fixture_path("minimal.json"))
        .arg("validate")
        .assert()
        .success();
}

#[test]
fn validate_json_report_on_failure() {
    let dir = TempDir::new().unwrap();
    let assert = cmd(&dir)
        .args([
            "validate",
            "--json",
            "--data",
            &fixture_path("empty_experience.json"),
        ])
        .assert()
        .code(1);

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["profile"], "standard");
    assert_eq!(report["error"]["path"], "experience");
    assert_eq!(report["error"]["kind"], "too-few-items");
    assert_eq!(report["error"]["required"], 1);
    assert_eq!(report["error"]["found"], 0);
}

#[test]
fn validate_json_report_on_success() {
    let dir = TempDir::new().unwrap();
    let assert = cmd(&dir)
        .args(["validate", "--json", "--data", &fixture_path("minimal.json")])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert!(report["error"].is_null());
}

#[test]
fn unknown_profile_is_usage_error() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["validate", "--profile", "lenient"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lenient"));
}

// -- generate --

#[test]
fn generate_writes_pdf() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out/resume.pdf");

    cmd(&dir)
        .args(["generate", "--data", &fixture_path("minimal.json")])
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("PDF generated successfully"))
        .stdout(predicate::str::contains("KB"));

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn generate_defaults_to_output_dir() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["generate", "--data", &fixture_path("minimal.json")])
        .assert()
        .success();

    assert!(dir.path().join("output/resume.pdf").exists());
}

#[test]
fn generate_tolerates_empty_sections() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("resume.pdf");

    cmd(&dir)
        .args(["generate", "--data", &fixture_path("sections_empty.json")])
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success();

    assert!(output.exists());
}

#[test]
fn generate_with_validate_stops_on_invalid_data() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("resume.pdf");

    cmd(&dir)
        .args(["generate", "--validate"])
        .args(["--data", &fixture_path("empty_experience.json")])
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .code(1);

    assert!(!output.exists());
}

#[test]
fn generate_rejects_zero_timeout() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["generate", "--timeout", "0"])
        .assert()
        .failure();
}

#[test]
fn invalid_env_configuration_exits_four() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .env("RENDER_TIMEOUT_SECS", "soon")
        .args(["validate", "--data", &fixture_path("minimal.json")])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("RENDER_TIMEOUT_SECS"));
}

#[test]
fn debug_prints_error_chain() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();

    cmd(&dir)
        .args(["--debug", "validate", "--data", broken.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Caused by"));
}
