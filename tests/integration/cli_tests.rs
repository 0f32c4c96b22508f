//! CLI integration tests
//!
//! Tests for command-line interface functionality

use super::fixtures::{create_test_dir, to_bytes};
use super::init_test_logging;
use std::fs;
use std::process::Command;

/// Run the CLI and capture output
fn run_cli_command(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_simdweave"))
        .args(args)
        .env_remove("SIMDWEAVE_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run simdweave");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_cli_help_command() {
    init_test_logging();

    let (stdout, _, success) = run_cli_command(&["--help"]);

    assert!(success, "Help command failed");
    for command in ["info", "selftest", "pack", "unpack", "config"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_cli_info_reports_backend() {
    let (stdout, _, success) = run_cli_command(&["info"]);
    assert!(success);
    assert!(stdout.contains(&format!("Backend: {}", simdweave::Capability::ACTIVE)));
    assert!(stdout.contains("packed3"));

    let (stdout, _, success) = run_cli_command(&["info", "--json"]);
    assert!(success);
    let info: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(info["backend"], simdweave::Capability::ACTIVE.name());
    assert_eq!(info["matrix"].as_array().unwrap().len(), simdweave::Op::ALL.len());
}

#[test]
fn test_cli_selftest_passes() {
    let (stdout, stderr, success) = run_cli_command(&["selftest", "--iterations", "4", "--json"]);
    assert!(success, "selftest failed: {stderr}");
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["failures"].as_array().unwrap().len(), 0);
}

#[test]
fn test_cli_config_init_and_validate() {
    let (_dir, path) = create_test_dir();
    let file = path.join("config.json");
    let file = file.to_str().unwrap();

    let (_, _, success) = run_cli_command(&["config", "--init", "-f", file]);
    assert!(success);
    let (_, _, success) = run_cli_command(&["config", "-f", file]);
    assert!(success);

    fs::write(file, r#"{ "layout": { "ways": 9 } }"#).unwrap();
    let (_, stderr, success) = run_cli_command(&["config", "-f", file]);
    assert!(!success);
    assert!(stderr.contains("layout.ways"));
}

#[test]
fn test_cli_pack_unpack_round_trip() {
    let (_dir, path) = create_test_dir();
    let x: Vec<u64> = (0..19).collect();
    let y: Vec<u64> = (0..19).map(|v| v * 3).collect();
    fs::write(path.join("x.raw"), to_bytes(&x)).unwrap();
    fs::write(path.join("y.raw"), to_bytes(&y)).unwrap();
    let p = |name: &str| path.join(name).to_str().unwrap().to_string();

    let (_, stderr, success) = run_cli_command(&[
        "pack", "-e", "u64", "-o", &p("xy.raw"), &p("x.raw"), &p("y.raw"),
    ]);
    assert!(success, "pack failed: {stderr}");

    let (_, stderr, success) = run_cli_command(&[
        "unpack", "-e", "u64", "-i", &p("xy.raw"), &p("x2.raw"), &p("y2.raw"),
    ]);
    assert!(success, "unpack failed: {stderr}");
    assert_eq!(fs::read(p("x2.raw")).unwrap(), to_bytes(&x));
    assert_eq!(fs::read(p("y2.raw")).unwrap(), to_bytes(&y));
}

#[test]
fn test_cli_pack_rejects_single_input() {
    let (_dir, path) = create_test_dir();
    let input = path.join("only.raw");
    fs::write(&input, [0u8; 8]).unwrap();
    let (_, _, success) = run_cli_command(&[
        "pack", "-o", path.join("o.raw").to_str().unwrap(), input.to_str().unwrap(),
    ]);
    assert!(!success);
}
