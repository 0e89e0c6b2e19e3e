#![cfg(feature = "cli")]

use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_erlext").to_string()
}

#[test]
fn cli_decodes_raw_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("term.bin");
    std::fs::write(&input, [131u8, 107, 0, 2, 104, 105]).unwrap();

    let out = Command::new(bin()).arg("decode").arg(&input).output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "[104,105]");
}

#[test]
fn cli_decodes_hex_as_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("term.hex");
    // 2^64 as SMALL_BIG_EXT
    std::fs::write(&input, "83 6e 09 00\n00 00 00 00 00 00 00 00 01\n").unwrap();

    let out = Command::new(bin())
        .args(["--json", "decode", "--hex"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        "\"18446744073709551616\""
    );
}

#[test]
fn cli_reports_decode_errors() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.bin");
    std::fs::write(&input, [130u8, 97, 1]).unwrap();

    let out = Command::new(bin()).arg("decode").arg(&input).output().unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown version"), "stderr: {stderr}");
}

#[test]
fn cli_strict_rejects_trailing_bytes() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("trailing.bin");
    std::fs::write(&input, [131u8, 97, 1, 0]).unwrap();

    let lenient = Command::new(bin()).arg("decode").arg(&input).status().unwrap();
    assert!(lenient.success());

    let strict = Command::new(bin())
        .args(["decode", "--strict"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(!strict.success());
}

#[test]
fn cli_header_reports_compressed_envelope() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("packed.bin");
    std::fs::write(
        &input,
        [
            131u8, 80, 0, 0, 0, 32, 120, 156, 75, 54, 208, 51, 192, 2, 82, 181, 13, 12, 24, 64, 0,
            0, 104, 41, 5, 114,
        ],
    )
    .unwrap();

    let out = Command::new(bin())
        .args(["--json", "header"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["compressed"], true);
    assert_eq!(json["size_hint"], 32);
    assert_eq!(json["tag"], 99);
    assert_eq!(json["tag_name"], "FLOAT_EXT");
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("SMALL_BIG_EXT"));
}
