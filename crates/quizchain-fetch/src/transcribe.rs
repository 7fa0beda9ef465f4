//! Speech-to-text over an OpenAI-compatible transcription endpoint.

use std::time::Duration;

use async_trait::async_trait;
use quizchain_core::parsers::Transcriber;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_TRANSCRIBE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TRANSCRIBE_MODEL: &str = "whisper-1";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

pub struct RemoteTranscriber {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl RemoteTranscriber {
    pub fn new(base_url: &str, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/v1/audio/transcriptions",
                base_url.trim_end_matches('/')
            ),
            api_key: api_key.into(),
            model: model.into(),
            timeout: Duration::from_secs(60),
        }
    }

    async fn request(&self, audio: &[u8], filename: &str) -> Result<String> {
        let file = Part::bytes(audio.to_vec()).file_name(filename.to_string());
        let form = Form::new()
            .text("model", self.model.clone())
            .part("file", file);

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body: TranscriptionResponse = resp
            .json()
            .await
            .map_err(|e| Error::Transcription(e.to_string()))?;
        Ok(body.text)
    }
}

#[async_trait]
impl Transcriber for RemoteTranscriber {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> quizchain_core::Result<String> {
        tracing::debug!("Transcribing {} ({} bytes)", filename, audio.len());
        self.request(audio, filename)
            .await
            .map_err(|e| quizchain_core::Error::Collaborator(format!("transcription failed: {e}")))
    }
}
