//! Blind discovery of a submit endpoint on the page's own origin.
//!
//! Each conventional path receives the real submission payload. The first
//! response that is not 404/405 is taken as both the endpoint and its
//! submit response, so the orchestrator does not post twice.

use std::time::Duration;

use quizchain_core::SubmitResponse;
use url::Url;

use crate::client::HttpClient;
use crate::submit::SubmitPayload;

pub const PROBE_PATHS: &[&str] = &[
    "/submit",
    "/api/submit",
    "/answer",
    "/api/answer",
    "/submit-answer",
    "/api/v1/submit",
    "/tds/submit",
    "/submit/",
    "/api/submit/",
    "/answer/",
    "/api/answer/",
    "/submit-answer/",
    "/api/v1/submit/",
    "/tds/submit/",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeHit {
    pub endpoint: String,
    pub response: SubmitResponse,
}

pub struct EndpointProber {
    client: HttpClient,
    timeout: Duration,
}

impl EndpointProber {
    pub fn new(client: HttpClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Candidate endpoints for `page_url`, in probing order.
    pub fn candidates(page_url: &Url) -> Vec<Url> {
        PROBE_PATHS
            .iter()
            .filter_map(|path| page_url.join(path).ok())
            .collect()
    }

    pub async fn probe(&self, page_url: &Url, payload: &SubmitPayload) -> Option<ProbeHit> {
        let body = payload.to_json();

        for candidate in Self::candidates(page_url) {
            tracing::debug!("Probing {}", candidate);
            match self
                .client
                .post_json(candidate.as_str(), &body, self.timeout)
                .await
            {
                Ok(resp) if resp.status == 404 || resp.status == 405 => continue,
                Ok(resp) => {
                    tracing::info!("Probe hit {} ({})", candidate, resp.status);
                    return Some(ProbeHit {
                        endpoint: candidate.to_string(),
                        response: SubmitResponse::from_body(resp.status, &resp.text()),
                    });
                }
                Err(e) => {
                    tracing::debug!("Probe {} failed: {}", candidate, e);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_stay_on_origin() {
        let page = Url::parse("https://quiz.example/level/3?x=1").unwrap();
        let candidates = EndpointProber::candidates(&page);

        assert_eq!(candidates.len(), PROBE_PATHS.len());
        assert_eq!(candidates[0].as_str(), "https://quiz.example/submit");
        assert_eq!(candidates[7].as_str(), "https://quiz.example/submit/");
        assert!(candidates.iter().all(|c| c.host_str() == Some("quiz.example")));
    }
}
