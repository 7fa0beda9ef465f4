use assert_cmd::Command;
use predicates::prelude::*;
use quizchain_cli::commands::TranscriptionArgs;
use quizchain_core::{AnswerValue, Method};
use std::io::Write;
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

fn no_transcription() -> TranscriptionArgs {
    TranscriptionArgs {
        openai_api_key: None,
        transcribe_url: "https://api.openai.com".to_string(),
        transcribe_model: "whisper-1".to_string(),
    }
}

#[test]
fn test_derive_sums_page_numbers() {
    let candidate = quizchain_cli::commands::derive::derive_from_files(
        &fixture("sum_page.txt"),
        &[],
        &no_transcription(),
    )
    .unwrap();

    assert_eq!(candidate.value, AnswerValue::Integer(100));
    assert_eq!(candidate.method, Method::HeuristicSumPageText);
}

#[test]
fn test_derive_csv_column_from_asset() {
    let candidate = quizchain_cli::commands::derive::derive_from_files(
        &fixture("csv_page.txt"),
        &[fixture("ledger.csv")],
        &no_transcription(),
    )
    .unwrap();

    assert_eq!(candidate.value, AnswerValue::Integer(500));
    assert_eq!(candidate.method, Method::CsvColumnSum);
    assert_eq!(candidate.metadata["column"], "amount");
}

#[test]
fn test_derive_pdf_page_sum() {
    let candidate = quizchain_cli::commands::derive::derive_from_files(
        &fixture("pdf_page.txt"),
        &[fixture("report.pdf")],
        &no_transcription(),
    )
    .unwrap();

    assert_eq!(candidate.value, AnswerValue::Integer(100));
    assert_eq!(candidate.method, Method::PdfPageSumAllNumbers);
    assert_eq!(candidate.metadata["page"], 2);
}

#[test]
fn test_derive_missing_asset_is_error() {
    let result = quizchain_cli::commands::derive::derive_from_files(
        &fixture("csv_page.txt"),
        &[fixture("does-not-exist.csv")],
        &no_transcription(),
    );

    let err = result.unwrap_err().to_string();
    assert!(err.contains("does-not-exist.csv"), "got: {}", err);
}

#[test]
fn test_derive_json_output() {
    let mut text = tempfile::NamedTempFile::new().unwrap();
    writeln!(text, "The code word is PURPLE_42").unwrap();

    let mut cmd = Command::new(get_quizchain_bin());
    cmd.env_remove("OPENAI_API_KEY")
        .arg("derive")
        .arg(text.path())
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"PURPLE_42\""))
        .stdout(predicate::str::contains("code_word_scrape"));
}

#[test]
fn test_derive_pretty_output() {
    let mut cmd = Command::new(get_quizchain_bin());
    cmd.env_remove("OPENAI_API_KEY")
        .arg("derive")
        .arg(fixture("csv_page.txt"))
        .arg("--asset")
        .arg(fixture("ledger.csv"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Answer:"))
        .stdout(predicate::str::contains("500"))
        .stdout(predicate::str::contains("csv_column_sum"));
}
