//! Answer derivation as an ordered rule table.
//!
//! Rules run in [`Rule::ORDER`]; the first one that matches decides the
//! candidate. A rule whose guard does not apply is `Skipped`, and one whose
//! parse fails is `Failed`; both fall through to the next rule. The final
//! rule always matches.

pub mod patterns;
mod rules;

use std::sync::Arc;

use quizchain_core::parsers::{
    CsvColumnSummer, LopdfPageText, PdfPageText, SimpleCsvSummer, Transcriber,
};
use quizchain_core::{AnswerCandidate, DownloadedAsset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    ExplicitAnswer,
    CodeWord,
    CsvColumnSum,
    PdfPage,
    AudioTranscript,
    PageTextSum,
    YesNo,
    Fallback,
}

impl Rule {
    pub const ORDER: [Rule; 8] = [
        Rule::ExplicitAnswer,
        Rule::CodeWord,
        Rule::CsvColumnSum,
        Rule::PdfPage,
        Rule::AudioTranscript,
        Rule::PageTextSum,
        Rule::YesNo,
        Rule::Fallback,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::ExplicitAnswer => "explicit-answer",
            Rule::CodeWord => "code-word",
            Rule::CsvColumnSum => "csv-column-sum",
            Rule::PdfPage => "pdf-page",
            Rule::AudioTranscript => "audio-transcript",
            Rule::PageTextSum => "page-text-sum",
            Rule::YesNo => "yes-no",
            Rule::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Matched(AnswerCandidate),
    Skipped,
    Failed(String),
}

/// Signals read once from the page text and shared by every rule
#[derive(Debug, Clone)]
pub struct DerivationInput<'a> {
    pub text: &'a str,
    pub assets: &'a [DownloadedAsset],
    pub column: Option<String>,
    pub page: Option<usize>,
}

impl<'a> DerivationInput<'a> {
    pub fn new(text: &'a str, assets: &'a [DownloadedAsset]) -> Self {
        Self {
            text,
            assets,
            column: patterns::column_name(text),
            page: patterns::page_number(text),
        }
    }
}

pub struct AnswerPipeline {
    csv: Box<dyn CsvColumnSummer>,
    pdf: Option<Box<dyn PdfPageText>>,
    transcriber: Option<Arc<dyn Transcriber>>,
}

impl Default for AnswerPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerPipeline {
    /// Pipeline with the built-in CSV summer and no PDF or audio support
    pub fn new() -> Self {
        Self {
            csv: Box::new(SimpleCsvSummer),
            pdf: None,
            transcriber: None,
        }
    }

    /// Pipeline with the built-in CSV summer and PDF extractor; audio still
    /// needs a transcriber
    pub fn standard() -> Self {
        Self::new().with_pdf_extractor(Box::new(LopdfPageText))
    }

    pub fn with_csv_summer(mut self, csv: Box<dyn CsvColumnSummer>) -> Self {
        self.csv = csv;
        self
    }

    pub fn with_pdf_extractor(mut self, pdf: Box<dyn PdfPageText>) -> Self {
        self.pdf = Some(pdf);
        self
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Derive exactly one candidate for the page.
    pub async fn derive(&self, text: &str, assets: &[DownloadedAsset]) -> AnswerCandidate {
        let input = DerivationInput::new(text, assets);

        for rule in Rule::ORDER {
            match self.evaluate(rule, &input).await {
                RuleOutcome::Matched(candidate) => {
                    tracing::debug!("Rule {} matched ({})", rule.name(), candidate.method);
                    return candidate;
                }
                RuleOutcome::Skipped => {
                    tracing::debug!("Rule {} skipped", rule.name());
                }
                RuleOutcome::Failed(reason) => {
                    tracing::debug!("Rule {} failed: {}", rule.name(), reason);
                }
            }
        }

        rules::fallback(input.text)
    }

    /// Run a single rule against the input.
    pub async fn evaluate(&self, rule: Rule, input: &DerivationInput<'_>) -> RuleOutcome {
        match rule {
            Rule::ExplicitAnswer => rules::explicit_answer(input),
            Rule::CodeWord => rules::code_word(input),
            Rule::CsvColumnSum => rules::csv_column_sum(self.csv.as_ref(), input),
            Rule::PdfPage => rules::pdf_page(self.pdf.as_deref(), input),
            Rule::AudioTranscript => {
                rules::audio_transcript(self.transcriber.as_deref(), input).await
            }
            Rule::PageTextSum => rules::page_text_sum(input),
            Rule::YesNo => rules::yes_no(input),
            Rule::Fallback => RuleOutcome::Matched(rules::fallback(input.text)),
        }
    }
}
