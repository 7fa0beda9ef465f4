use thiserror::Error;

use crate::guard::GuardRejection;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Blocked by address guard: {0}")]
    Guard(#[from] GuardRejection),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Drive download failed: {0}")]
    Drive(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Too many redirects fetching {0}")]
    Redirects(String),

    #[error("Browser error: {0}")]
    Browser(#[from] quizchain_browser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
