use std::path::PathBuf;
use std::time::Duration;

use quizchain_fetch::{DEFAULT_DRIVE_ENDPOINT, DEFAULT_TRANSCRIBE_MODEL, DEFAULT_TRANSCRIBE_URL};

pub const DEFAULT_TIMEOUT_SECS: u64 = 170;

/// Remote speech-to-text settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl TranscriptionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_TRANSCRIBE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_TRANSCRIBE_MODEL.to_string(),
        }
    }
}

/// Knobs for one solve invocation
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wall-clock budget for the whole chain
    pub overall_timeout: Duration,
    pub navigation_timeout: Duration,
    pub asset_timeout: Duration,
    pub submit_timeout: Duration,
    pub probe_timeout: Duration,
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    /// Write each visited page here when set
    pub dump_dir: Option<PathBuf>,
    pub transcription: Option<TranscriptionConfig>,
    pub drive_endpoint: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overall_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            navigation_timeout: Duration::from_secs(30),
            asset_timeout: Duration::from_secs(8),
            submit_timeout: Duration::from_secs(12),
            probe_timeout: Duration::from_secs(8),
            headless: true,
            chrome_path: None,
            dump_dir: None,
            transcription: None,
            drive_endpoint: DEFAULT_DRIVE_ENDPOINT.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.overall_timeout = Duration::from_secs(secs);
        self
    }

    /// `<temp dir>/quizchain-debug`
    pub fn default_dump_dir() -> PathBuf {
        std::env::temp_dir().join("quizchain-debug")
    }
}
