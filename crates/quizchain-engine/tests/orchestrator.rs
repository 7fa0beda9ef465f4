use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use quizchain_browser::{BrowserPage, FetchedResource};
use quizchain_core::dump::DebugSink;
use quizchain_core::{AnswerValue, DownloadedAsset, Method, SubmitResponse};
use quizchain_engine::{EngineConfig, Orchestrator, QuizSession, StopReason};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone)]
struct FakePage {
    visible_text: String,
    html: String,
}

/// In-memory browser: pages and same-origin resources keyed by URL
#[derive(Default)]
struct FakeBrowser {
    pages: HashMap<String, FakePage>,
    resources: HashMap<String, (String, Vec<u8>)>,
    current: Option<FakePage>,
    visited: Vec<String>,
}

impl FakeBrowser {
    fn page(mut self, url: &str, visible_text: &str, html: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            FakePage {
                visible_text: visible_text.to_string(),
                html: html.to_string(),
            },
        );
        self
    }

    fn resource(mut self, url: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.resources
            .insert(url.to_string(), (content_type.to_string(), bytes.to_vec()));
        self
    }

    fn current(&self) -> quizchain_browser::Result<&FakePage> {
        self.current
            .as_ref()
            .ok_or_else(|| quizchain_browser::Error::Script("no page loaded".to_string()))
    }
}

#[async_trait]
impl BrowserPage for FakeBrowser {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> quizchain_browser::Result<()> {
        self.visited.push(url.to_string());
        match self.pages.get(url) {
            Some(page) => {
                self.current = Some(page.clone());
                Ok(())
            }
            None => Err(quizchain_browser::Error::Timeout {
                operation: "navigation",
                after_ms: timeout.as_millis(),
            }),
        }
    }

    async fn html(&self) -> quizchain_browser::Result<String> {
        Ok(self.current()?.html.clone())
    }

    async fn visible_text(&self) -> quizchain_browser::Result<String> {
        Ok(self.current()?.visible_text.clone())
    }

    async fn select_texts(&self, _selector: &str) -> quizchain_browser::Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn fetch(&self, url: &str, _timeout: Duration) -> quizchain_browser::Result<FetchedResource> {
        Ok(match self.resources.get(url) {
            Some((content_type, bytes)) => FetchedResource {
                status: 200,
                content_type: Some(content_type.clone()),
                bytes: bytes.clone(),
            },
            None => FetchedResource {
                status: 404,
                content_type: None,
                bytes: Vec::new(),
            },
        })
    }
}

#[derive(Default)]
struct RecordingSink {
    pages: Mutex<Vec<(String, usize)>>,
}

impl DebugSink for RecordingSink {
    fn record_page(&self, url: &str, _html: &str, assets: &[DownloadedAsset]) {
        self.pages.lock().unwrap().push((url.to_string(), assets.len()));
    }
}

fn config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.submit_timeout = Duration::from_secs(5);
    config.probe_timeout = Duration::from_secs(5);
    config
}

fn session(start: &str, budget: Duration) -> QuizSession {
    QuizSession::new(start, "student@example.com", "s3cret", budget)
}

#[tokio::test]
async fn test_follows_chain_until_dead_end() {
    let server = MockServer::start().await;
    let base = server.uri();
    let q1 = format!("{base}/q1");
    let q2 = format!("{base}/q2");

    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(body_partial_json(json!({
            "email": "student@example.com",
            "secret": "s3cret",
            "url": q1,
            "answer": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"correct": true, "url": q2})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(body_partial_json(json!({"url": q2, "answer": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"correct": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut browser = FakeBrowser::default()
        .page(
            &q1,
            "Please compute the sum of the 'value' column.",
            r#"<a href="/data.csv">data</a><form action="/submit"></form>"#,
        )
        .page(
            &q2,
            "What is the sum of 1 and 2?",
            r#"<p>Post to <a href="/submit">/submit</a></p>"#,
        )
        .resource(&format!("{base}/data.csv"), "text/csv", b"item,value\nA,5\nB,7\nC,8\n");

    let sink = Arc::new(RecordingSink::default());
    let orchestrator = Orchestrator::new(config())
        .unwrap()
        .with_sink(sink.clone());
    let report = orchestrator
        .run(&mut browser, session(&q1, Duration::from_secs(60)))
        .await;

    assert_eq!(report.stop_reason, StopReason::DeadEnd);
    assert_eq!(report.results.len(), 2);

    let first = &report.results[0];
    assert_eq!(first.url, q1);
    assert_eq!(first.submit_url.as_deref(), Some(format!("{base}/submit").as_str()));
    let derived = first.derived.as_ref().unwrap();
    assert_eq!(derived.value, AnswerValue::Integer(20));
    assert_eq!(derived.method, Method::CsvColumnSum);

    let second = &report.results[1];
    assert_eq!(second.url, q2);
    assert_eq!(second.derived.as_ref().unwrap().value, AnswerValue::Integer(3));
    assert_eq!(browser.visited, vec![q1.clone(), q2.clone()]);

    let recorded = sink.pages.lock().unwrap().clone();
    assert_eq!(recorded, vec![(q1, 1), (q2, 0)]);
}

#[tokio::test]
async fn test_navigation_failure_is_recorded() {
    let mut browser = FakeBrowser::default();
    let orchestrator = Orchestrator::new(config()).unwrap();

    let report = orchestrator
        .run(
            &mut browser,
            session("https://unreachable.example/q1", Duration::from_secs(60)),
        )
        .await;

    assert_eq!(report.stop_reason, StopReason::NavigationFailed);
    assert_eq!(report.results.len(), 1);
    let result = &report.results[0];
    assert!(result.derived.is_none());
    assert!(result.submit_url.is_none());
    assert_eq!(
        result.submit_response.to_json()["error"],
        json!("navigation failed")
    );
}

#[tokio::test]
async fn test_no_submit_url_after_probing() {
    let server = MockServer::start().await;
    let q1 = format!("{}/q1", server.uri());
    let mut browser = FakeBrowser::default().page(&q1, "Is it ready? yes", "<p>Is it ready?</p>");

    let orchestrator = Orchestrator::new(config()).unwrap();
    let report = orchestrator
        .run(&mut browser, session(&q1, Duration::from_secs(60)))
        .await;

    assert_eq!(report.stop_reason, StopReason::NoSubmitUrl);
    let result = &report.results[0];
    assert_eq!(result.submit_response, SubmitResponse::NoSubmitUrl);
    assert_eq!(
        result.derived.as_ref().unwrap().value,
        AnswerValue::Bool(true)
    );
    assert_eq!(
        serde_json::to_value(result).unwrap()["submit_response"],
        json!({"error": "no submit url found"})
    );
}

#[tokio::test]
async fn test_probe_response_is_not_reposted() {
    let server = MockServer::start().await;
    let q1 = format!("{}/q1", server.uri());
    Mock::given(method("POST"))
        .and(path("/api/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"correct": false})))
        .expect(1)
        .mount(&server)
        .await;

    let mut browser = FakeBrowser::default().page(&q1, "The code word is ORCA", "<p></p>");
    let orchestrator = Orchestrator::new(config()).unwrap();
    let report = orchestrator
        .run(&mut browser, session(&q1, Duration::from_secs(60)))
        .await;

    assert_eq!(report.stop_reason, StopReason::DeadEnd);
    let result = &report.results[0];
    assert_eq!(
        result.submit_url.as_deref(),
        Some(format!("{}/api/submit", server.uri()).as_str())
    );
    assert_eq!(result.derived.as_ref().unwrap().method, Method::CodeWordScrape);
}

#[tokio::test]
async fn test_non_json_response_ends_chain() {
    let server = MockServer::start().await;
    let q1 = format!("{}/q1", server.uri());
    Mock::given(method("POST"))
        .and(path("/submit"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let mut browser =
        FakeBrowser::default().page(&q1, "hello", r#"<a href="/submit">submit</a>"#);
    let orchestrator = Orchestrator::new(config()).unwrap();
    let report = orchestrator
        .run(&mut browser, session(&q1, Duration::from_secs(60)))
        .await;

    assert_eq!(report.stop_reason, StopReason::DeadEnd);
    assert_eq!(
        report.results[0].submit_response.to_json(),
        json!({"http_status": 502, "text": "Bad Gateway"})
    );
}

#[tokio::test]
async fn test_expired_deadline_returns_empty() {
    let mut browser = FakeBrowser::default();
    let orchestrator = Orchestrator::new(config()).unwrap();
    let report = orchestrator
        .run(&mut browser, session("https://q.example/1", Duration::ZERO))
        .await;

    assert_eq!(report.stop_reason, StopReason::Deadline);
    assert!(report.results.is_empty());
    assert!(browser.visited.is_empty());
}

#[tokio::test]
async fn test_empty_start_url() {
    let mut browser = FakeBrowser::default();
    let orchestrator = Orchestrator::new(config()).unwrap();
    let report = orchestrator
        .run(&mut browser, session("", Duration::from_secs(5)))
        .await;

    assert_eq!(report.stop_reason, StopReason::EmptyUrl);
    assert!(report.results.is_empty());
    assert_eq!(orchestrator.config().overall_timeout, Duration::from_secs(170));
}
