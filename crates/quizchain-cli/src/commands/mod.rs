pub mod completion;
pub mod derive;
pub mod resolve;
pub mod solve;

use clap::Args;
use quizchain_engine::TranscriptionConfig;
use quizchain_fetch::{DEFAULT_TRANSCRIBE_MODEL, DEFAULT_TRANSCRIBE_URL};

/// Speech-to-text settings shared by commands that derive answers
#[derive(Args, Debug, Clone)]
pub struct TranscriptionArgs {
    /// API key for the transcription endpoint; audio is ignored without one
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of an OpenAI-compatible transcription API
    #[arg(long, env = "QUIZCHAIN_TRANSCRIBE_URL", default_value = DEFAULT_TRANSCRIBE_URL)]
    pub transcribe_url: String,

    /// Transcription model name
    #[arg(long, env = "QUIZCHAIN_TRANSCRIBE_MODEL", default_value = DEFAULT_TRANSCRIBE_MODEL)]
    pub transcribe_model: String,
}

impl TranscriptionArgs {
    pub fn to_config(&self) -> Option<TranscriptionConfig> {
        let api_key = self.openai_api_key.as_deref()?.trim();
        if api_key.is_empty() {
            return None;
        }
        Some(TranscriptionConfig {
            base_url: self.transcribe_url.clone(),
            api_key: api_key.to_string(),
            model: self.transcribe_model.clone(),
        })
    }
}
