//! CLI smoke tests for the foodgram-server binary: help output,
//! configuration checks and a short mock-database run.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn run_foodgram_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_foodgram-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute foodgram-server")
}

async fn run_foodgram_server_with_timeout(
    args: &[&str],
    timeout_duration: Duration,
) -> Result<std::process::Output, Box<dyn std::error::Error>> {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_foodgram-server"));
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match timeout(timeout_duration, cmd.output()).await {
        Ok(result) => result.map_err(|e| e.into()),
        Err(elapsed) => Err(elapsed.into()),
    }
}

/// Writes `body` below a `server:` section whose home_dir points into `dir`.
fn write_config(dir: &Path, body: &str) -> PathBuf {
    let home = dir.join("home").to_string_lossy().replace('\\', "/");
    let path = dir.join("config.yaml");
    let content = format!(
        "server:\n  home_dir: \"{home}\"\n  host: 127.0.0.1\n  port: 0\n{body}"
    );
    std::fs::write(&path, content).expect("Failed to write config file");
    path
}

#[test]
fn test_cli_help_command() {
    let output = run_foodgram_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("foodgram-server"), "{stdout}");
    assert!(stdout.contains("Usage:"), "{stdout}");
    assert!(stdout.contains("run"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--mock"));
}

#[test]
fn test_cli_version_command() {
    let output = run_foodgram_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("foodgram-server 0.1.0"), "{stdout}");
}

#[test]
fn test_cli_invalid_command() {
    let output = run_foodgram_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "{stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_foodgram_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"), "{stderr}");
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_foodgram_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn test_cli_config_validation_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
database:
  url: "sqlite://database/foodgram.db"

logging:
  default:
    console_level: "off"
    file: "logs/foodgram.log"
    file_level: info

modules:
  recipes:
    default_page_size: 10
    public_base_url: "https://food.example"
"#,
    );

    let output = run_foodgram_server(&["--config", config_path.to_str().unwrap(), "check"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "STDOUT: {stdout}\nSTDERR: {stderr}");
    assert!(stdout.contains("Configuration check passed"), "{stdout}");
    assert!(stdout.contains("https://food.example"), "{stdout}");
}

#[test]
fn test_cli_check_rejects_unknown_module_setting() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
modules:
  recipes:
    page_size: 10
"#,
    );

    let output = run_foodgram_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("recipes"), "{stderr}");
}

#[test]
fn test_cli_check_rejects_root_media_url() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
modules:
  recipes:
    media_url: "/"
"#,
    );

    let output = run_foodgram_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("media_url"), "{stderr}");
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_foodgram_server(&[
        "--config",
        config_path.to_str().unwrap(),
        "--port",
        "9123",
        "--print-config",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9123"), "{stdout}");
}

#[tokio::test]
async fn test_cli_run_command_with_mock_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
logging:
  default:
    console_level: "off"
    file: "logs/foodgram.log"
    file_level: info
"#,
    );

    let result = run_foodgram_server_with_timeout(
        &["--config", config_path.to_str().unwrap(), "--mock", "run"],
        Duration::from_secs(5),
    )
    .await;

    // Still running when the timeout fires means startup succeeded.
    match result {
        Err(err) => assert!(
            err.to_string().contains("elapsed"),
            "Server failed to start: {err}"
        ),
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("Server exited early ({}): {stderr}", output.status);
        }
    }
}

#[test]
fn test_cli_run_without_database_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
logging:
  default:
    console_level: "off"
    file: "logs/foodgram.log"
"#,
    );

    let output = run_foodgram_server(&["--config", config_path.to_str().unwrap(), "run"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No database configuration found"), "{stderr}");
}
