#![cfg(feature = "cli")]

use std::process::Command;

fn xbeelink() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xbeelink"))
}

#[test]
fn version_prints_package_version() {
    let output = xbeelink()
        .arg("version")
        .output()
        .expect("binary should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_extended_prints_provenance() {
    let output = xbeelink()
        .args(["version", "--extended"])
        .output()
        .expect("binary should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("target_os:"));
    assert!(stdout.contains("features:"));
}

#[test]
fn decode_prints_at_response_as_json() {
    let output = xbeelink()
        .args(["--format", "json", "decode", "7E00058801424400F0"])
        .output()
        .expect("binary should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("AtResponse"));
    assert!(stdout.contains("id=1"));
}

#[test]
fn decode_reads_frames_with_noise_prefix() {
    let output = xbeelink()
        .args(["--format", "json", "decode", "DE AD 7E00028A066F"])
        .output()
        .expect("binary should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ModemStatus"));
    assert!(stdout.contains("Coordinator started"));
}

#[test]
fn decode_rejects_corrupt_checksum() {
    let output = xbeelink()
        .args(["decode", "7E00058801424400F1"])
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn decode_rejects_odd_hex_input() {
    let output = xbeelink()
        .args(["decode", "7E0"])
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    let output = xbeelink().output().expect("binary should run");
    assert!(!output.status.success());
}
