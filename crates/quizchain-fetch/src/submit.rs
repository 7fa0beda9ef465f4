//! Answer submission.

use std::time::Duration;

use quizchain_core::SubmitResponse;
use serde::Serialize;
use serde_json::Value;

use crate::client::HttpClient;

/// JSON body posted to a submit endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitPayload {
    pub email: String,
    pub secret: String,
    pub url: String,
    pub answer: Value,
}

impl SubmitPayload {
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "email": self.email,
            "secret": self.secret,
            "url": self.url,
            "answer": self.answer,
        })
    }
}

/// POST the payload; every outcome, transport failures included, is data.
pub async fn post_answer(
    client: &HttpClient,
    endpoint: &str,
    payload: &SubmitPayload,
    timeout: Duration,
) -> SubmitResponse {
    tracing::info!("Submitting answer to {}", endpoint);

    match client.post_json(endpoint, &payload.to_json(), timeout).await {
        Ok(body) => {
            tracing::debug!("Submit returned status {}", body.status);
            SubmitResponse::from_body(body.status, &body.text())
        }
        Err(e) => {
            tracing::warn!("Submit to {} failed: {}", endpoint, e);
            SubmitResponse::TransportError {
                detail: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> SubmitPayload {
        SubmitPayload {
            email: "a@b.c".to_string(),
            secret: "s3".to_string(),
            url: "https://quiz.example/q1".to_string(),
            answer: json!(60),
        }
    }

    #[tokio::test]
    async fn test_json_response_is_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit"))
            .and(body_json(payload().to_json()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"correct": true, "url": "https://quiz.example/q2"})),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let resp = post_answer(
            &client,
            &format!("{}/submit", server.uri()),
            &payload(),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(resp.next_url(), Some("https://quiz.example/q2"));
    }

    #[tokio::test]
    async fn test_plain_text_degrades() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let resp = post_answer(&client, &server.uri(), &payload(), Duration::from_secs(5)).await;

        assert_eq!(resp.to_json(), json!({"http_status": 500, "text": "oops"}));
        assert!(resp.next_url().is_none());
    }

    #[tokio::test]
    async fn test_transport_error_degrades() {
        let client = HttpClient::new().unwrap();
        // Port 9 on loopback is closed in test environments.
        let resp = post_answer(
            &client,
            "http://127.0.0.1:9/submit",
            &payload(),
            Duration::from_secs(2),
        )
        .await;

        assert!(matches!(resp, SubmitResponse::TransportError { .. }));
    }
}
