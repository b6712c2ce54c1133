#![cfg(feature = "cli")]

use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};

use nativebridge::frame::{FrameReader, FrameWriter};

fn frames(payloads: &[&[u8]]) -> Vec<u8> {
    let mut writer = FrameWriter::new(Vec::new());
    for payload in payloads {
        writer.write_frame(payload).expect("frame should encode");
    }
    writer.into_inner()
}

fn responses(stdout: &[u8]) -> Vec<serde_json::Value> {
    let mut reader = FrameReader::new(stdout);
    let mut out = Vec::new();
    while let Some(frame) = reader.read_frame().expect("stdout should hold whole frames") {
        out.push(serde_json::from_slice(&frame.payload).expect("response should be json"));
    }
    out
}

/// Run the host with `input` on stdin and return its output.
fn run_host(input: &[u8], log_file: &Path, extra: &[&str]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_nativebridge"))
        .arg("--log-file")
        .arg(log_file)
        .arg("--log-level")
        .arg("debug")
        .arg("--api-base-url")
        .arg("http://127.0.0.1:9")
        .arg("--timeout")
        .arg("2s")
        .args(extra)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("host should start");

    {
        let mut stdin = child.stdin.take().expect("stdin should be piped");
        stdin.write_all(input).expect("input should be written");
    }

    let output = child.wait_with_output().expect("host should exit");
    let mut log = String::new();
    if let Ok(mut file) = std::fs::File::open(log_file) {
        let _ = file.read_to_string(&mut log);
    }
    assert!(
        !log.contains("sk-should-not-be-logged"),
        "credential leaked into log:\n{log}"
    );
    output
}

#[test]
fn closed_stdin_exits_cleanly_without_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let log_file = dir.path().join("host.log");

    let output = run_host(
        &[],
        &log_file,
        &["chrome-extension://abcdefghijklmnopabcdefghijklmnop/"],
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());

    let log = std::fs::read_to_string(&log_file).expect("log should exist");
    assert!(log.contains("native host started"), "{log}");
    assert!(log.contains("session ended"), "{log}");
}

#[test]
fn missing_credential_returns_one_error_frame() {
    let dir = tempfile::tempdir().expect("temp dir");
    let log_file = dir.path().join("host.log");

    let output = run_host(
        &frames(&[br#"{"text":"hi"}"#, br#"{"apiKey":"k","text":"later"}"#]),
        &log_file,
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    let responses = responses(&output.stdout);
    assert_eq!(
        responses,
        vec![serde_json::json!({ "error": "missing credential: no apiKey found in message" })]
    );

    let log = std::fs::read_to_string(&log_file).expect("log should exist");
    assert!(log.contains("exchange failed"), "{log}");
}

#[test]
fn truncated_frame_reports_malformed_frame() {
    let dir = tempfile::tempdir().expect("temp dir");
    let log_file = dir.path().join("host.log");

    let mut input = 100u32.to_le_bytes().to_vec();
    input.extend_from_slice(br#"{"apiKey":"sk-should-not-be-logged"}"#);

    let output = run_host(&input, &log_file, &[]);

    assert_eq!(output.status.code(), Some(60));
    let responses = responses(&output.stdout);
    assert_eq!(responses.len(), 1);
    assert!(responses[0]["error"]
        .as_str()
        .expect("error string")
        .starts_with("malformed frame:"));
}

#[test]
fn unreachable_service_is_reported_as_error_frame() {
    let dir = tempfile::tempdir().expect("temp dir");
    let log_file = dir.path().join("host.log");

    let output = run_host(
        &frames(&[br#"{"apiKey":"sk-should-not-be-logged","text":"hi"}"#]),
        &log_file,
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    let responses = responses(&output.stdout);
    assert_eq!(responses.len(), 1);
    assert!(responses[0]["error"]
        .as_str()
        .expect("error string")
        .starts_with("network error:"));
}

#[test]
fn stderr_logging_keeps_stdout_clean() {
    let output = run_host_stderr(&frames(&[br#"{}"#]));

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(responses(&output.stdout).len(), 1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exchange failed"), "{stderr}");
}

fn run_host_stderr(input: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_nativebridge"))
        .args(["--log-file", "-", "--api-base-url", "http://127.0.0.1:9"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("host should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(input)
        .expect("input should be written");

    child.wait_with_output().expect("host should exit")
}
