use crate::Result;
use async_trait::async_trait;

/// Speech-to-text for audio assets
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String>;
}
