use std::fs;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

const VALID_HEX: &str = "43474155000000000000000000fa0026022003";

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("cgau"))
}

fn valid_payload() -> Vec<u8> {
    let mut payload = b"CGAU".to_vec();
    payload.resize(13, 0);
    for word in [250u16, 550, 800] {
        payload.extend_from_slice(&word.to_le_bytes());
    }
    payload
}

fn write_payload(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).expect("write payload");
    path
}

fn stdout_json(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_supports_decode_and_parse() {
    cmd()
        .arg("frame")
        .arg("decode")
        .arg("--help")
        .assert()
        .success();
    cmd()
        .arg("frame")
        .arg("parse")
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn decode_file_to_stdout() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_payload(&temp, "payload.bin", &valid_payload());

    let assert = cmd()
        .arg("frame")
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .arg("--topic")
        .arg("qingping/582D34AABBCC/up")
        .assert()
        .success();
    let value = stdout_json(assert.get_output());
    assert_eq!(value["report_version"], 1);
    assert_eq!(value["device"], "582D34AABBCC");
    assert_eq!(value["input"]["bytes"], 19);
    let sensor = &value["result"]["sensor"];
    assert_eq!(sensor["temperature"], 25.0);
    assert_eq!(sensor["humidity"], 55);
    assert_eq!(sensor["carbon_dioxide"], 800);
    assert_eq!(sensor["sensor_offset_bytes"], 13);
    assert!(value["result"]["timestamp"].is_string());
}

#[test]
fn decode_hex_matches_file() {
    let assert = cmd()
        .arg("frame")
        .arg("decode")
        .arg("--hex")
        .arg(VALID_HEX)
        .arg("--stdout")
        .assert()
        .success();
    let value = stdout_json(assert.get_output());
    assert_eq!(value["input"]["source"], "hex");
    assert_eq!(value["result"]["sensor"]["temperature_raw"], 250);
    assert!(value.get("device").is_none());
}

#[test]
fn unrecognized_header_yields_empty_result() {
    let assert = cmd()
        .arg("frame")
        .arg("decode")
        .arg("--hex")
        .arg("00112233445566")
        .arg("--stdout")
        .assert()
        .success();
    let value = stdout_json(assert.get_output());
    assert_eq!(value["result"]["sensor"], serde_json::json!({}));
    assert_eq!(value["result"]["historical_data"], serde_json::json!([]));
}

#[test]
fn strict_fails_on_truncated_frame() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_payload(&temp, "short.bin", &valid_payload()[..15]);
    let report = temp.path().join("report.json");

    cmd()
        .arg("frame")
        .arg("decode")
        .arg(input)
        .arg("-o")
        .arg(&report)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("no reading decoded").and(contains("need 19 bytes, got 15")));
    assert!(report.exists());
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.bin");

    cmd()
        .arg("frame")
        .arg("decode")
        .arg(missing)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn invalid_hex_is_rejected() {
    cmd()
        .arg("frame")
        .arg("decode")
        .arg("--hex")
        .arg("abc")
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("invalid hex payload"));
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("frame")
        .arg("decode")
        .arg("--hex")
        .arg(VALID_HEX)
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_payload(&temp, "payload.bin", &valid_payload());

    cmd()
        .arg("frame")
        .arg("decode")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("report path must differ from input"));
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_payload(&temp, "payload.bin", &valid_payload());
    let report = temp.path().join("out").join("report.json");

    cmd()
        .arg("frame")
        .arg("decode")
        .arg(input)
        .arg("-o")
        .arg(&report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
    let written: Value =
        serde_json::from_str(&fs::read_to_string(report).expect("read report")).expect("json");
    assert_eq!(written["result"]["sensor"]["carbon_dioxide_raw"], 800);
}

#[test]
fn glob_with_multiple_matches_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    write_payload(&temp, "a.bin", &valid_payload());
    write_payload(&temp, "b.bin", &valid_payload());
    let pattern = temp.path().join("*.bin");

    cmd()
        .arg("frame")
        .arg("decode")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("multiple files match pattern"));
}

#[test]
fn debug_dump_is_logged() {
    cmd()
        .arg("frame")
        .arg("decode")
        .arg("--hex")
        .arg(VALID_HEX)
        .arg("--stdout")
        .arg("--debug")
        .assert()
        .success()
        .stderr(contains("=== Payload Analysis ===").and(contains("Length: 19 bytes")));
}

#[test]
fn decode_outcome_is_logged_at_debug_level() {
    cmd()
        .env("RUST_LOG", "debug")
        .arg("frame")
        .arg("decode")
        .arg("--hex")
        .arg(VALID_HEX)
        .arg("--stdout")
        .assert()
        .success()
        .stderr(contains("decoded payload").and(contains("decoded=true")));
}

#[test]
fn dump_prints_sections() {
    cmd()
        .arg("frame")
        .arg("dump")
        .arg("--hex")
        .arg("4347415500312e352e31")
        .assert()
        .success()
        .stdout(contains("Number of sections: 2").and(contains("Firmware: 1.5.1")));
}

#[test]
fn dump_json_is_valid() {
    let assert = cmd()
        .arg("frame")
        .arg("dump")
        .arg("--hex")
        .arg("43474155")
        .arg("--json")
        .assert()
        .success();
    let value = stdout_json(assert.get_output());
    assert_eq!(value["length"], 4);
    assert_eq!(value["sections"][0]["readable"], "CGAU");
}
