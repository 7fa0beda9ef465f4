//! Static submit-endpoint resolution.
//!
//! Steps run in [`ResolutionStep::ORDER`] over the captured page and stop at
//! the first hit. Blind probing is a network operation and lives with the
//! HTTP client, not here.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::content::{anchor_hrefs, form_actions};

lazy_static! {
    static ref ABSOLUTE_URL: Regex = Regex::new(r#"https?://[^\s"'<>`\\]+"#).unwrap();
    static ref ROOT_RELATIVE_URL: Regex =
        Regex::new(r#"(?:^|[\s"'`(=:>])(/[A-Za-z0-9_\-./?=&%~+]*)"#).unwrap();
}

const PAYLOAD_SUBMIT_KEYS: &[&str] = &["submit", "submit_url", "submitUrl"];
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStep {
    PayloadSubmitField,
    PayloadUrlField,
    Anchor,
    FormAction,
    CandidateBlocks,
    PageHtml,
}

impl ResolutionStep {
    pub const ORDER: [ResolutionStep; 6] = [
        ResolutionStep::PayloadSubmitField,
        ResolutionStep::PayloadUrlField,
        ResolutionStep::Anchor,
        ResolutionStep::FormAction,
        ResolutionStep::CandidateBlocks,
        ResolutionStep::PageHtml,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEndpoint {
    pub url: String,
    pub step: ResolutionStep,
}

/// Everything the resolver reads from one page
#[derive(Debug, Clone, Copy)]
pub struct ResolverInput<'a> {
    pub page_url: &'a Url,
    pub html: &'a str,
    pub blocks: &'a [String],
    pub payload: Option<&'a Map<String, Value>>,
}

pub struct SubmitResolver;

impl SubmitResolver {
    /// First endpoint found by the static steps, absolute against the page URL.
    pub fn resolve(input: &ResolverInput<'_>) -> Option<ResolvedEndpoint> {
        ResolutionStep::ORDER.into_iter().find_map(|step| {
            let raw = Self::run_step(step, input)?;
            let url = absolutize(input.page_url, &raw)?;
            tracing::debug!("Submit endpoint {} via {:?}", url, step);
            Some(ResolvedEndpoint { url, step })
        })
    }

    pub fn run_step(step: ResolutionStep, input: &ResolverInput<'_>) -> Option<String> {
        match step {
            ResolutionStep::PayloadSubmitField => {
                let payload = input.payload?;
                PAYLOAD_SUBMIT_KEYS
                    .iter()
                    .filter_map(|key| payload.get(*key).and_then(Value::as_str))
                    .map(str::trim)
                    .find(|v| !v.is_empty())
                    .map(str::to_string)
            }
            ResolutionStep::PayloadUrlField => input
                .payload?
                .get("url")
                .and_then(Value::as_str)
                .filter(|u| contains_submit(u))
                .map(|u| u.trim().to_string()),
            ResolutionStep::Anchor => first_containing_submit(anchor_hrefs(input.html)),
            ResolutionStep::FormAction => first_containing_submit(form_actions(input.html)),
            ResolutionStep::CandidateBlocks => {
                input.blocks.iter().find_map(|block| find_submit_url(block))
            }
            ResolutionStep::PageHtml => find_submit_url(input.html),
        }
    }
}

fn contains_submit(s: &str) -> bool {
    s.to_ascii_lowercase().contains("submit")
}

fn first_containing_submit(values: Vec<String>) -> Option<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .find(|v| contains_submit(v) && has_http_scheme_or_relative(v))
}

/// Relative references pass; absolute ones must be http(s)
fn has_http_scheme_or_relative(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => is_http(&url),
        Err(_) => true,
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// First absolute, then root-relative, URL in free text that mentions "submit"
pub fn find_submit_url(text: &str) -> Option<String> {
    let absolute = ABSOLUTE_URL
        .find_iter(text)
        .map(|m| clean_url(m.as_str()))
        .find(|u| contains_submit(u));
    if absolute.is_some() {
        return absolute;
    }

    ROOT_RELATIVE_URL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_url(m.as_str()))
        .filter(|u| !u.starts_with("//"))
        .find(|u| contains_submit(u))
}

fn clean_url(raw: &str) -> String {
    raw.trim_end_matches(TRAILING_PUNCTUATION)
        .replace("&amp;", "&")
}

/// Join against the page URL; absolute inputs are returned as given.
///
/// Anything that does not end up as an http(s) URL is rejected.
pub fn absolutize(page_url: &Url, raw: &str) -> Option<String> {
    if let Ok(url) = Url::parse(raw) {
        return is_http(&url).then(|| raw.to_string());
    }
    page_url
        .join(raw)
        .ok()
        .filter(is_http)
        .map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> Url {
        Url::parse("https://quiz.example/level/2").unwrap()
    }

    fn resolve(html: &str, blocks: &[String], payload: Option<&Map<String, Value>>) -> Option<ResolvedEndpoint> {
        let page = page();
        SubmitResolver::resolve(&ResolverInput {
            page_url: &page,
            html,
            blocks,
            payload,
        })
    }

    #[test]
    fn test_payload_submit_field_wins() {
        let payload = json!({"submitUrl": "/api/answers", "url": "/submit-other"});
        let html = r#"<a href="/submit">go</a>"#;
        let hit = resolve(html, &[], payload.as_object()).unwrap();
        assert_eq!(hit.url, "https://quiz.example/api/answers");
        assert_eq!(hit.step, ResolutionStep::PayloadSubmitField);
    }

    #[test]
    fn test_payload_url_needs_submit() {
        let payload = json!({"url": "https://quiz.example/next"});
        assert!(resolve("", &[], payload.as_object()).is_none());

        let payload = json!({"url": "https://quiz.example/submit"});
        let hit = resolve("", &[], payload.as_object()).unwrap();
        assert_eq!(hit.step, ResolutionStep::PayloadUrlField);
    }

    #[test]
    fn test_anchor_before_form() {
        let html = r#"<form action="/form-submit"></form><a href="answers/submit">x</a>"#;
        let hit = resolve(html, &[], None).unwrap();
        assert_eq!(hit.url, "https://quiz.example/level/answers/submit");
        assert_eq!(hit.step, ResolutionStep::Anchor);
    }

    #[test]
    fn test_form_action() {
        let html = r#"<a href="/data.csv">d</a><form action="/form-submit"></form>"#;
        let hit = resolve(html, &[], None).unwrap();
        assert_eq!(hit.url, "https://quiz.example/form-submit");
        assert_eq!(hit.step, ResolutionStep::FormAction);
    }

    #[test]
    fn test_candidate_block_scan() {
        let blocks = vec!["POST your answer to https://tds.example/submit.".to_string()];
        let hit = resolve("<p>https://other.example/submit</p>", &blocks, None).unwrap();
        assert_eq!(hit.url, "https://tds.example/submit");
        assert_eq!(hit.step, ResolutionStep::CandidateBlocks);
    }

    #[test]
    fn test_root_relative_in_html() {
        let html = r#"<script>fetch("/api/v2/submit", {method: "POST"})</script>"#;
        let hit = resolve(html, &[], None).unwrap();
        assert_eq!(hit.url, "https://quiz.example/api/v2/submit");
        assert_eq!(hit.step, ResolutionStep::PageHtml);
    }

    #[test]
    fn test_nothing_found() {
        assert!(resolve("<p>no endpoints here</p>", &["hello".to_string()], None).is_none());
    }

    #[test]
    fn test_absolute_kept_verbatim() {
        assert_eq!(
            absolutize(&page(), "https://x.example/Submit?a=1"),
            Some("https://x.example/Submit?a=1".to_string())
        );
    }

    #[test]
    fn test_script_anchor_skipped_for_later_step() {
        let html = r#"<a href="javascript:submitAnswer()">Submit</a><p>POST to /api/submit</p>"#;
        let hit = resolve(html, &[], None).unwrap();
        assert_eq!(hit.url, "https://quiz.example/api/submit");
        assert_eq!(hit.step, ResolutionStep::PageHtml);
    }

    #[test]
    fn test_script_anchor_skipped_within_step() {
        let html = r#"<a href="mailto:submit@quiz.example">mail</a><a href="/submit">go</a>"#;
        let hit = resolve(html, &[], None).unwrap();
        assert_eq!(hit.url, "https://quiz.example/submit");
        assert_eq!(hit.step, ResolutionStep::Anchor);
    }

    #[test]
    fn test_non_http_payload_field_rejected() {
        let payload = json!({"submit": "javascript:submit()"});
        let html = r#"<form action="/form-submit"></form>"#;
        let hit = resolve(html, &[], payload.as_object()).unwrap();
        assert_eq!(hit.step, ResolutionStep::FormAction);
        assert_eq!(absolutize(&page(), "mailto:submit@quiz.example"), None);
    }

    #[test]
    fn test_find_submit_url_trims_punctuation() {
        assert_eq!(
            find_submit_url("(see https://a.example/submit),"),
            Some("https://a.example/submit".to_string())
        );
        assert_eq!(find_submit_url("//cdn.example/submit.js"), None);
    }
}
