//! Inbound solve request and its admission checks.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestRejection {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid secret")]
    InvalidSecret,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SolveRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub url: String,
}

impl SolveRequest {
    pub fn new(
        email: impl Into<String>,
        secret: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
            url: url.into(),
        }
    }

    /// Reject requests missing an email or URL, or carrying the wrong secret
    /// when one is expected.
    pub fn validate(&self, expected_secret: Option<&str>) -> Result<(), RequestRejection> {
        if self.email.trim().is_empty() {
            return Err(RequestRejection::MissingField("email"));
        }
        if self.url.trim().is_empty() {
            return Err(RequestRejection::MissingField("url"));
        }
        if let Some(expected) = expected_secret {
            if self.secret.trim() != expected.trim() {
                return Err(RequestRejection::InvalidSecret);
            }
        }
        Ok(())
    }
}
