//! Regex guards and extractors shared by the derivation rules.

use lazy_static::lazy_static;
use quizchain_core::AnswerValue;
use regex::Regex;

lazy_static! {
    static ref EXPLICIT_ANSWER: Regex =
        Regex::new(r#"(?i)"answer"\s*:\s*(".*?"|\d+(\.\d+)?)"#).unwrap();
    static ref CODE_WORD_MENTION: Regex =
        Regex::new(r"(?i)\b(secret|code word|codeword)\b").unwrap();
    static ref CODE_WORD_PATTERNS: Vec<Regex> = [
        r#"(?i)code\s*word\s*(?:is|:)\s*["']?\s*([A-Za-z0-9\-_]{3,40})\s*["']?"#,
        r#"(?i)the\s*secret\s*(?:is|:)\s*["']?\s*([A-Za-z0-9\-_]{3,40})\s*["']?"#,
        r"(?i)code[:\s]+\b([A-Za-z0-9\-_]{3,40})\b",
        r"(?i)\bsecret[:\s]+\b([A-Za-z0-9\-_]{3,40})\b",
        r#"(?i)["']([A-Za-z0-9\-_]{4,40})["']\s*(?:is the secret|is the code)"#,
        r"(?i)(?:secret|code)[^\n\r]{0,40}([A-Za-z0-9\-_]{3,40})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
    static ref COLUMN_NAME: Regex =
        Regex::new(r#"(?i)sum of (?:the )?["']?([A-Za-z0-9 _\-]+)["']? column"#).unwrap();
    static ref PAGE_NUMBER: Regex =
        Regex::new(r"(?i)page\s*(?:no\.?|number)?\s*(\d+)").unwrap();
    static ref SUM_WORD: Regex = Regex::new(r"(?i)\bsum\b").unwrap();
    static ref YES_NO_QUESTION: Regex =
        Regex::new(r"(?i)\bis it\b|\bshould\b|\bis the\b").unwrap();
    static ref YES: Regex = Regex::new(r"(?i)\byes\b").unwrap();
    static ref NO: Regex = Regex::new(r"(?i)\bno\b").unwrap();
}

/// A literal `"answer": <value>` in the text.
///
/// Quoted values come back as text with the quotes stripped; numeric
/// literals come back as numbers.
pub fn explicit_answer(text: &str) -> Option<AnswerValue> {
    let caps = EXPLICIT_ANSWER.captures(text)?;
    let raw = caps.get(1)?.as_str();

    if let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        return Some(AnswerValue::Text(inner.to_string()));
    }
    if raw.contains('.') {
        return raw.parse::<f64>().ok().map(AnswerValue::Float);
    }
    Some(match raw.parse::<i64>() {
        Ok(n) => AnswerValue::Integer(n),
        Err(_) => AnswerValue::Text(raw.to_string()),
    })
}

pub fn mentions_code_word(text: &str) -> bool {
    CODE_WORD_MENTION.is_match(text)
}

/// The token introduced by the first matching code-word phrasing
pub fn extract_code_word(text: &str) -> Option<String> {
    CODE_WORD_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// Column named in a "sum of the 'X' column" request
pub fn column_name(text: &str) -> Option<String> {
    COLUMN_NAME
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Page referenced as "page N", "page no. N" or "page number N"; page 0 is ignored
pub fn page_number(text: &str) -> Option<usize> {
    PAGE_NUMBER
        .captures(text)
        .and_then(|caps| caps[1].parse::<usize>().ok())
        .filter(|n| *n > 0)
}

pub fn mentions_sum(text: &str) -> bool {
    SUM_WORD.is_match(text)
}

pub fn asks_yes_no(text: &str) -> bool {
    YES_NO_QUESTION.is_match(text)
}

/// `Some(true)` if "yes" appears, else `Some(false)` if "no" appears
pub fn yes_or_no(text: &str) -> Option<bool> {
    if YES.is_match(text) {
        Some(true)
    } else if NO.is_match(text) {
        Some(false)
    } else {
        None
    }
}

/// Up to `radius` characters either side of the first case-insensitive
/// occurrence of `needle`.
pub fn window_around(text: &str, needle: &str, radius: usize) -> Option<String> {
    let pattern = format!(r"(?is).{{0,{radius}}}{}.{{0,{radius}}}", regex::escape(needle));
    let re = Regex::new(&pattern).ok()?;
    re.find(text).map(|m| m.as_str().to_string())
}

/// First `limit` characters of the trimmed text
pub fn snippet(text: &str, limit: usize) -> String {
    text.trim().chars().take(limit).collect()
}
