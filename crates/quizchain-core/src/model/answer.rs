use crate::numbers::Number;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The value submitted as `answer` for a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Structured(Value),
}

impl AnswerValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnswerValue::Integer(n) => Some(*n as f64),
            AnswerValue::Float(f) => Some(*f),
            AnswerValue::Structured(v) => v.as_f64(),
            AnswerValue::Bool(_) | AnswerValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form used in the submit payload.
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            AnswerValue::Bool(b) => Value::Bool(*b),
            AnswerValue::Integer(n) => Value::from(*n),
            AnswerValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AnswerValue::Text(s) => Value::String(s.clone()),
            AnswerValue::Structured(v) => v.clone(),
        }
    }
}

impl From<Number> for AnswerValue {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => AnswerValue::Integer(i),
            Number::Float(f) => AnswerValue::Float(f),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        AnswerValue::Text(s)
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        AnswerValue::Bool(b)
    }
}

/// Identifies the derivation heuristic that produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    ExplicitJsonString,
    CodeWordScrape,
    CsvColumnSum,
    CsvFirstNumericSum,
    PdfPageColumnSumSnippet,
    PdfPageSumAllNumbers,
    AudioTranscriptionCode,
    AudioTranscriptionSum,
    HeuristicSumPageText,
    HeuristicBoolYesPresent,
    HeuristicBoolNoPresent,
    FallbackSnippet,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::ExplicitJsonString => "explicit_json_string",
            Method::CodeWordScrape => "code_word_scrape",
            Method::CsvColumnSum => "csv_column_sum",
            Method::CsvFirstNumericSum => "csv_first_numeric_sum",
            Method::PdfPageColumnSumSnippet => "pdf_page_column_sum_snippet",
            Method::PdfPageSumAllNumbers => "pdf_page_sum_all_numbers",
            Method::AudioTranscriptionCode => "audio_transcription_code",
            Method::AudioTranscriptionSum => "audio_transcription_sum",
            Method::HeuristicSumPageText => "heuristic_sum_page_text",
            Method::HeuristicBoolYesPresent => "heuristic_bool_yes_present",
            Method::HeuristicBoolNoPresent => "heuristic_bool_no_present",
            Method::FallbackSnippet => "fallback_snippet",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single answer chosen for a page, tagged with the rule that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerCandidate {
    pub value: AnswerValue,
    pub method: Method,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl AnswerCandidate {
    pub fn new(value: impl Into<AnswerValue>, method: Method) -> Self {
        Self {
            value: value.into(),
            method,
            metadata: Map::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}
