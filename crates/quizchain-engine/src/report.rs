use quizchain_core::PageVisitResult;
use serde::Serialize;
use serde_json::{Value, json};

/// Why the page loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The last submit response carried no next URL
    DeadEnd,
    Deadline,
    NavigationFailed,
    NoSubmitUrl,
    /// The loop was handed an empty URL
    EmptyUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveReport {
    pub results: Vec<PageVisitResult>,
    pub stop_reason: StopReason,
    pub elapsed_seconds: f64,
}

impl SolveReport {
    /// Response body in the shape the HTTP front end returns
    pub fn to_response_json(&self) -> Value {
        json!({
            "ok": true,
            "elapsed_seconds": self.elapsed_seconds,
            "stop_reason": self.stop_reason,
            "results": self.results,
        })
    }
}
