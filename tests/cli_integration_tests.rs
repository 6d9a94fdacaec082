use std::process::Command;
use tempfile::TempDir;

fn manifest_path() -> String {
    format!("{}/Cargo.toml", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn test_cli_help_command() {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--manifest-path", &manifest_path(), "--", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("srctl"));
    assert!(stdout.contains("export"));
    assert!(stdout.contains("import"));
}

#[test]
fn test_cli_init_command_in_temp_dir() {
    let temp_dir = TempDir::new().unwrap();

    let output = Command::new("cargo")
        .args(["run", "--quiet", "--manifest-path", &manifest_path(), "--", "init"])
        .current_dir(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(temp_dir.path().join("srctlconfig.yaml").exists());
}

#[test]
fn test_import_requires_a_path_argument() {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--manifest-path", &manifest_path(), "--", "import", "subject"])
        .output()
        .expect("Failed to execute command");

    // clap rejects the invocation before any registry work happens
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--file"));
}
