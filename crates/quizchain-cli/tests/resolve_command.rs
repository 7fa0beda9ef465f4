use assert_cmd::Command;
use predicates::prelude::*;
use quizchain_detectors::ResolutionStep;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_quizchain_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("quizchain")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_resolve_anchor_against_page_url() {
    let resolved = quizchain_cli::commands::resolve::resolve_file(
        &fixture("quiz_page.html"),
        "https://quiz.example.com/q/3",
    )
    .unwrap()
    .expect("Should find the submit anchor");

    assert_eq!(resolved.url, "https://quiz.example.com/submit");
    assert_eq!(resolved.step, ResolutionStep::Anchor);
}

#[test]
fn test_resolve_nothing_found() {
    let resolved = quizchain_cli::commands::resolve::resolve_file(
        &fixture("no_submit_page.html"),
        "https://quiz.example.com/q/4",
    )
    .unwrap();

    assert!(resolved.is_none());
}

#[test]
fn test_resolve_rejects_bad_page_url() {
    let result =
        quizchain_cli::commands::resolve::resolve_file(&fixture("quiz_page.html"), "not a url");
    assert!(result.is_err());
}

#[test]
fn test_resolve_json_output() {
    let mut cmd = Command::new(get_quizchain_bin());
    cmd.arg("resolve")
        .arg(fixture("quiz_page.html"))
        .arg("--page-url")
        .arg("https://quiz.example.com/q/3")
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "\"endpoint\": \"https://quiz.example.com/submit\"",
        ))
        .stdout(predicate::str::contains("\"step\": \"anchor\""));
}

#[test]
fn test_resolve_pretty_lists_probe_candidates() {
    let mut cmd = Command::new(get_quizchain_bin());
    cmd.arg("resolve")
        .arg(fixture("no_submit_page.html"))
        .arg("--page-url")
        .arg("https://quiz.example.com/q/4");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("none"))
        .stdout(predicate::str::contains("https://quiz.example.com/submit"))
        .stdout(predicate::str::contains("https://quiz.example.com/api/submit"));
}
