//! Structured views of a captured page: links, forms, inline payloads and
//! the text blocks the resolver scans.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

lazy_static! {
    static ref ANCHOR: Selector = Selector::parse("a[href]").unwrap();
    static ref FORM: Selector = Selector::parse("form[action]").unwrap();
    static ref ATOB_CALL: Regex =
        Regex::new(r#"atob\(\s*[`"']([A-Za-z0-9+/=\s\\]+)[`"']\s*\)"#).unwrap();
    static ref FLAT_OBJECT: Regex = Regex::new(r"\{[^{}]*\}").unwrap();
}

/// Selectors whose rendered text is captured as candidate blocks
pub const CANDIDATE_SELECTORS: &str = "#result, pre";

/// `href` of every anchor, in document order
pub fn anchor_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// `action` of every form, in document order
pub fn form_actions(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&FORM)
        .filter_map(|f| f.value().attr("action"))
        .map(str::to_string)
        .collect()
}

/// Text of every element matching `selectors`, read from static HTML.
///
/// Offline counterpart of the browser's selector query; script-rendered
/// content is not visible here.
pub fn selector_texts(html: &str, selectors: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selectors) else {
        tracing::debug!("Invalid selector {}", selectors);
        return Vec::new();
    };
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .collect()
}

/// Decode the base64 literals passed to `atob(...)` in inline scripts.
///
/// Literals that do not decode are skipped.
pub fn decode_inline_payloads(html: &str) -> Vec<String> {
    ATOB_CALL
        .captures_iter(html)
        .filter_map(|caps| {
            let literal: String = caps[1]
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '\\')
                .collect();
            match STANDARD.decode(literal.as_bytes()) {
                Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
                Err(e) => {
                    tracing::debug!("Skipping undecodable atob literal: {}", e);
                    None
                }
            }
        })
        .collect()
}

/// Brace-delimited substrings of `text` that look like flat JSON objects
pub fn json_substrings(text: &str) -> Vec<String> {
    FLAT_OBJECT
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Candidate text blocks: selector texts, decoded inline payloads, then the
/// JSON-looking substrings of both.
pub fn candidate_blocks(selector_texts: &[String], html: &str) -> Vec<String> {
    let mut blocks: Vec<String> = selector_texts
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    blocks.extend(decode_inline_payloads(html));

    let json: Vec<String> = blocks.iter().flat_map(|b| json_substrings(b)).collect();
    blocks.extend(json);
    blocks
}

/// First block, or brace-delimited substring of one, that parses as a JSON
/// object.
pub fn embedded_payload(blocks: &[String]) -> Option<Map<String, Value>> {
    for block in blocks {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(block.trim()) {
            return Some(map);
        }
        for candidate in json_substrings(block) {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&candidate) {
                return Some(map);
            }
        }
    }
    None
}
