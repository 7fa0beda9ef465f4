use quizchain_core::numbers::{Number, extract_numbers, sum, sum_numbers_in};
use quizchain_core::parsers::{ColumnSums, CsvColumnSummer, PdfPageText, Transcriber};
use quizchain_core::{AnswerCandidate, AssetKind, DownloadedAsset, Method};

use super::patterns;
use super::{DerivationInput, RuleOutcome};

const PDF_WINDOW: usize = 120;
const TRANSCRIPT_PREFIX: usize = 200;
const FALLBACK_LIMIT: usize = 400;

fn assets_of<'a>(
    input: &'a DerivationInput<'_>,
    kind: AssetKind,
) -> impl Iterator<Item = &'a DownloadedAsset> {
    input
        .assets
        .iter()
        .filter(move |a| a.kind == kind && !a.bytes.is_empty())
}

pub(super) fn explicit_answer(input: &DerivationInput<'_>) -> RuleOutcome {
    match patterns::explicit_answer(input.text) {
        Some(value) => RuleOutcome::Matched(AnswerCandidate::new(value, Method::ExplicitJsonString)),
        None => RuleOutcome::Skipped,
    }
}

pub(super) fn code_word(input: &DerivationInput<'_>) -> RuleOutcome {
    if !patterns::mentions_code_word(input.text) {
        return RuleOutcome::Skipped;
    }
    match patterns::extract_code_word(input.text) {
        Some(token) => RuleOutcome::Matched(
            AnswerCandidate::new(token, Method::CodeWordScrape).with_meta("found_in", "page_text"),
        ),
        None => RuleOutcome::Failed("code word mentioned but no token found".to_string()),
    }
}

pub(super) fn csv_column_sum(
    summer: &dyn CsvColumnSummer,
    input: &DerivationInput<'_>,
) -> RuleOutcome {
    let Some(column) = input.column.as_deref() else {
        return RuleOutcome::Skipped;
    };
    let mut csvs = assets_of(input, AssetKind::Csv).peekable();
    if csvs.peek().is_none() {
        return RuleOutcome::Skipped;
    }

    let mut last_failure = String::new();
    for asset in csvs {
        let sums = match summer.sum_columns(&asset.bytes, Some(column)) {
            Ok(sums) => sums,
            Err(e) => {
                last_failure = format!("{}: {}", asset.filename, e);
                continue;
            }
        };

        let picked = match sums {
            ColumnSums::Scalar(total) => Some((column.to_string(), total, Method::CsvColumnSum)),
            ColumnSums::Columns(columns) => match columns.iter().find(|(name, _)| name == column) {
                Some((name, total)) => Some((name.clone(), *total, Method::CsvColumnSum)),
                None => columns
                    .first()
                    .map(|(name, total)| (name.clone(), *total, Method::CsvFirstNumericSum)),
            },
        };

        match picked {
            Some((name, total, method)) => {
                return RuleOutcome::Matched(
                    AnswerCandidate::new(Number::from_f64(total), method)
                        .with_meta("column", name)
                        .with_meta("source", asset.filename.as_str()),
                );
            }
            None => last_failure = format!("{}: no numeric columns", asset.filename),
        }
    }

    RuleOutcome::Failed(last_failure)
}

pub(super) fn pdf_page(
    extractor: Option<&dyn PdfPageText>,
    input: &DerivationInput<'_>,
) -> RuleOutcome {
    let Some(page) = input.page else {
        return RuleOutcome::Skipped;
    };
    let mut pdfs = assets_of(input, AssetKind::Pdf).peekable();
    if pdfs.peek().is_none() {
        return RuleOutcome::Skipped;
    }
    let Some(extractor) = extractor else {
        return RuleOutcome::Skipped;
    };

    let mut last_failure = String::new();
    for asset in pdfs {
        let text = match extractor.page_text(&asset.bytes, page) {
            Ok(text) => text,
            Err(e) => {
                last_failure = format!("{}: {}", asset.filename, e);
                continue;
            }
        };

        if let Some(column) = input.column.as_deref() {
            if let Some(window) = patterns::window_around(&text, column, PDF_WINDOW) {
                if let Some(total) = sum(&extract_numbers(&window)) {
                    return RuleOutcome::Matched(
                        AnswerCandidate::new(total, Method::PdfPageColumnSumSnippet)
                            .with_meta("page", page)
                            .with_meta("column", column)
                            .with_meta("snippet", window),
                    );
                }
            }
        }

        match sum_numbers_in(&text) {
            Some((total, count)) => {
                return RuleOutcome::Matched(
                    AnswerCandidate::new(total, Method::PdfPageSumAllNumbers)
                        .with_meta("page", page)
                        .with_meta("count", count),
                );
            }
            None => last_failure = format!("{}: no numbers on page {}", asset.filename, page),
        }
    }

    RuleOutcome::Failed(last_failure)
}

pub(super) async fn audio_transcript(
    transcriber: Option<&dyn Transcriber>,
    input: &DerivationInput<'_>,
) -> RuleOutcome {
    let mut clips = assets_of(input, AssetKind::Audio).peekable();
    if clips.peek().is_none() {
        return RuleOutcome::Skipped;
    }
    let Some(transcriber) = transcriber else {
        return RuleOutcome::Skipped;
    };

    let mut last_failure = String::new();
    for asset in clips {
        let transcript = match transcriber.transcribe(&asset.bytes, &asset.filename).await {
            Ok(text) => text,
            Err(e) => {
                last_failure = format!("{}: {}", asset.filename, e);
                continue;
            }
        };
        let prefix = patterns::snippet(&transcript, TRANSCRIPT_PREFIX);

        if patterns::mentions_code_word(&transcript) {
            if let Some(token) = patterns::extract_code_word(&transcript) {
                return RuleOutcome::Matched(
                    AnswerCandidate::new(token, Method::AudioTranscriptionCode)
                        .with_meta("transcript", prefix),
                );
            }
        }

        match sum_numbers_in(&transcript) {
            Some((total, count)) => {
                return RuleOutcome::Matched(
                    AnswerCandidate::new(total, Method::AudioTranscriptionSum)
                        .with_meta("transcript_snippet", prefix)
                        .with_meta("count", count),
                );
            }
            None => last_failure = format!("{}: transcript has no usable content", asset.filename),
        }
    }

    RuleOutcome::Failed(last_failure)
}

pub(super) fn page_text_sum(input: &DerivationInput<'_>) -> RuleOutcome {
    if !patterns::mentions_sum(input.text) {
        return RuleOutcome::Skipped;
    }
    match sum_numbers_in(input.text) {
        Some((total, count)) => RuleOutcome::Matched(
            AnswerCandidate::new(total, Method::HeuristicSumPageText).with_meta("count", count),
        ),
        None => RuleOutcome::Failed("no numeric tokens in page text".to_string()),
    }
}

pub(super) fn yes_no(input: &DerivationInput<'_>) -> RuleOutcome {
    if !patterns::asks_yes_no(input.text) {
        return RuleOutcome::Skipped;
    }
    match patterns::yes_or_no(input.text) {
        Some(true) => RuleOutcome::Matched(AnswerCandidate::new(true, Method::HeuristicBoolYesPresent)),
        Some(false) => {
            RuleOutcome::Matched(AnswerCandidate::new(false, Method::HeuristicBoolNoPresent))
        }
        None => RuleOutcome::Failed("question without yes/no".to_string()),
    }
}

pub(super) fn fallback(text: &str) -> AnswerCandidate {
    AnswerCandidate::new(patterns::snippet(text, FALLBACK_LIMIT), Method::FallbackSnippet)
}
