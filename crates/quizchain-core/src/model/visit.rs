use super::AnswerCandidate;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use url::Url;

/// What came back from posting an answer, or why nothing was posted
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResponse {
    /// The endpoint answered with a JSON body
    Json(Value),
    /// The endpoint answered with a body that is not JSON
    Text { http_status: u16, text: String },
    /// The request never produced a response
    TransportError { detail: String },
    /// No endpoint could be resolved for the page
    NoSubmitUrl,
    /// The page could not be loaded
    NavigationFailed { detail: String },
}

impl SubmitResponse {
    /// Interpret a response body, degrading to `{http_status, text}` when it is not JSON
    pub fn from_body(http_status: u16, body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => SubmitResponse::Json(value),
            Err(_) => SubmitResponse::Text {
                http_status,
                text: body.to_string(),
            },
        }
    }

    /// The `url` field of a JSON object response, exactly as sent
    pub fn next_url(&self) -> Option<&str> {
        match self {
            SubmitResponse::Json(Value::Object(map)) => map
                .get("url")
                .and_then(Value::as_str)
                .filter(|u| !u.trim().is_empty()),
            _ => None,
        }
    }

    /// Resolve the next URL against the page that was just answered.
    ///
    /// Absolute URLs are returned verbatim; relative ones are joined.
    pub fn resolve_next_url(&self, current_url: &str) -> Option<String> {
        let next = self.next_url()?;
        if Url::parse(next).is_ok() {
            return Some(next.to_string());
        }
        Url::parse(current_url)
            .and_then(|base| base.join(next))
            .map(|u| u.to_string())
            .ok()
    }

    pub fn to_json(&self) -> Value {
        match self {
            SubmitResponse::Json(value) => value.clone(),
            SubmitResponse::Text { http_status, text } => {
                json!({ "http_status": http_status, "text": text })
            }
            SubmitResponse::TransportError { detail } => {
                json!({ "http_status": "exception", "text": detail })
            }
            SubmitResponse::NoSubmitUrl => json!({ "error": "no submit url found" }),
            SubmitResponse::NavigationFailed { detail } => {
                json!({ "error": "navigation failed", "detail": detail })
            }
        }
    }
}

impl Serialize for SubmitResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// The record of one loop iteration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageVisitResult {
    pub url: String,
    pub submit_url: Option<String>,
    pub derived: Option<AnswerCandidate>,
    pub submit_response: SubmitResponse,
}

impl PageVisitResult {
    pub fn submitted(
        url: impl Into<String>,
        submit_url: impl Into<String>,
        derived: AnswerCandidate,
        submit_response: SubmitResponse,
    ) -> Self {
        Self {
            url: url.into(),
            submit_url: Some(submit_url.into()),
            derived: Some(derived),
            submit_response,
        }
    }

    pub fn no_submit_url(url: impl Into<String>, derived: AnswerCandidate) -> Self {
        Self {
            url: url.into(),
            submit_url: None,
            derived: Some(derived),
            submit_response: SubmitResponse::NoSubmitUrl,
        }
    }

    pub fn navigation_failed(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            submit_url: None,
            derived: None,
            submit_response: SubmitResponse::NavigationFailed {
                detail: detail.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnswerCandidate, Method};

    #[test]
    fn test_non_json_body_degrades_to_status_and_text() {
        let response = SubmitResponse::from_body(502, "<html>Bad gateway</html>");
        assert_eq!(
            response.to_json(),
            json!({ "http_status": 502, "text": "<html>Bad gateway</html>" })
        );
        assert_eq!(response.next_url(), None);
    }

    #[test]
    fn test_next_url_is_returned_verbatim() {
        let response = SubmitResponse::from_body(
            200,
            r#"{"correct": true, "url": "https://quiz.example.com/q2?step=2"}"#,
        );
        assert_eq!(response.next_url(), Some("https://quiz.example.com/q2?step=2"));
        assert_eq!(
            response.resolve_next_url("https://quiz.example.com/q1").as_deref(),
            Some("https://quiz.example.com/q2?step=2")
        );
    }

    #[test]
    fn test_absolute_next_url_is_not_normalized() {
        // Url::to_string would append a trailing slash here
        let response = SubmitResponse::Json(json!({ "url": "https://quiz.example.com" }));
        assert_eq!(
            response.resolve_next_url("https://other.example.com/a").as_deref(),
            Some("https://quiz.example.com")
        );
    }

    #[test]
    fn test_relative_next_url_is_joined() {
        let response = SubmitResponse::Json(json!({ "url": "/q3" }));
        assert_eq!(
            response.resolve_next_url("https://quiz.example.com/q2").as_deref(),
            Some("https://quiz.example.com/q3")
        );
    }

    #[test]
    fn test_missing_or_empty_url_ends_chain() {
        assert_eq!(SubmitResponse::Json(json!({ "correct": true })).next_url(), None);
        assert_eq!(SubmitResponse::Json(json!({ "url": "" })).next_url(), None);
        assert_eq!(SubmitResponse::Json(json!({ "url": null })).next_url(), None);
        assert_eq!(SubmitResponse::Json(json!(["url"])).next_url(), None);
    }

    #[test]
    fn test_terminal_markers_serialize_as_data() {
        let derived = AnswerCandidate::new("x", Method::FallbackSnippet);
        let result = PageVisitResult::no_submit_url("https://quiz.example.com/q", derived);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["submit_url"], Value::Null);
        assert_eq!(json["submit_response"]["error"], "no submit url found");

        let failed = PageVisitResult::navigation_failed("https://quiz.example.com/q", "timeout");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["derived"], Value::Null);
        assert_eq!(json["submit_response"]["error"], "navigation failed");
    }

    #[test]
    fn test_transport_error_matches_degraded_shape() {
        let response = SubmitResponse::TransportError {
            detail: "connection refused".to_string(),
        };
        assert_eq!(response.to_json()["http_status"], "exception");
    }
}
