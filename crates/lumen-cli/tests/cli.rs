use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn write_source(dir: &tempfile::TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create source file");
    file.write_all(text.as_bytes()).expect("write source file");
    path
}

#[test]
fn check_reports_clean_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "ok.lm", "class C { void M() { } }\n");

    Command::cargo_bin("lumen")
        .expect("binary")
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no syntax errors"));
}

#[test]
fn check_fails_on_syntax_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "bad.lm", "class C { void M( }\n");

    Command::cargo_bin("lumen")
        .expect("binary")
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn check_json_lists_diagnostics() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "bad.lm", "class C { int x = ; }\n");

    let output = Command::cargo_bin("lumen")
        .expect("binary")
        .arg("--json")
        .arg("check")
        .arg(&path)
        .output()
        .expect("run binary");
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON report");
    let diagnostics = report["diagnostics"].as_array().expect("diagnostics array");
    assert!(!diagnostics.is_empty());
    assert!(diagnostics[0]["message"].is_string());
}

#[test]
fn parse_prints_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "ok.lm", "int x = 1;\n");

    Command::cargo_bin("lumen")
        .expect("binary")
        .arg("parse")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("CompilationUnit"));
}

#[test]
fn missing_file_is_an_error() {
    Command::cargo_bin("lumen")
        .expect("binary")
        .arg("check")
        .arg("no-such-file.lm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn verbose_flag_is_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "ok.lm", "class C { }\n");

    Command::cargo_bin("lumen")
        .expect("binary")
        .arg("-vv")
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no syntax errors"));
}
