use std::time::Duration;

use quizchain_core::PageVisitResult;
use tokio::time::Instant;

/// Per-invocation loop state, owned by the orchestrator
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub current_url: String,
    pub deadline: Instant,
    pub email: String,
    pub secret: String,
    pub results: Vec<PageVisitResult>,
}

impl QuizSession {
    /// Start a session whose deadline is `budget` from now
    pub fn new(
        start_url: impl Into<String>,
        email: impl Into<String>,
        secret: impl Into<String>,
        budget: Duration,
    ) -> Self {
        Self {
            current_url: start_url.into(),
            deadline: Instant::now() + budget,
            email: email.into(),
            secret: secret.into(),
            results: Vec::new(),
        }
    }

    pub fn has_url(&self) -> bool {
        !self.current_url.trim().is_empty()
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_budget_is_expired() {
        let session = QuizSession::new("https://q.example", "e", "s", Duration::ZERO);
        assert!(session.expired());
        assert_eq!(session.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_blank_url() {
        let session = QuizSession::new("  ", "e", "s", Duration::from_secs(5));
        assert!(!session.has_url());
        assert!(!session.expired());
    }
}
