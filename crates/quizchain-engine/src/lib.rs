//! Solve a chain of quiz pages with a controlled browser.
//!
//! [`solve`] launches Chromium, runs the [`Orchestrator`] loop and always
//! tears the browser down. Only a browser that cannot start is an error;
//! every other failure is recorded in the returned results.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod request;
pub mod session;
pub mod snapshot;

pub use config::{EngineConfig, TranscriptionConfig};
pub use error::{Error, Result};
pub use orchestrator::Orchestrator;
pub use report::{SolveReport, StopReason};
pub use request::{RequestRejection, SolveRequest};
pub use session::QuizSession;
pub use snapshot::PageSnapshot;

use quizchain_browser::{ChromeFinder, ChromiumSession, LaunchOptions, ProfileManager};
use quizchain_core::PageVisitResult;

/// Visit `start_url` and follow the chain for up to `timeout_seconds`.
pub async fn solve(
    start_url: &str,
    email: &str,
    secret: &str,
    timeout_seconds: u64,
) -> Result<Vec<PageVisitResult>> {
    let config = EngineConfig::default().with_timeout_secs(timeout_seconds);
    let report = solve_with_report(&config, start_url, email, secret).await?;
    Ok(report.results)
}

/// Like [`solve`], with full configuration and the reason the loop stopped.
pub async fn solve_with_report(
    config: &EngineConfig,
    start_url: &str,
    email: &str,
    secret: &str,
) -> Result<SolveReport> {
    let session = QuizSession::new(start_url, email, secret, config.overall_timeout);
    let orchestrator = Orchestrator::new(config.clone())?;

    let launch_error = |e: quizchain_browser::Error| Error::Launch(e.to_string());
    let chrome = ChromeFinder::new(config.chrome_path.clone())
        .find()
        .map_err(launch_error)?;
    let profile = ProfileManager::temporary().map_err(launch_error)?;
    let options =
        LaunchOptions::new(chrome, profile.path().to_path_buf()).headless(config.headless);
    let browser = ChromiumSession::launch(&options, profile)
        .await
        .map_err(launch_error)?;

    let report = match browser.new_page().await {
        Ok(mut page) => Ok(orchestrator.run(&mut page, session).await),
        Err(e) => Err(launch_error(e)),
    };

    if let Err(e) = browser.close().await {
        tracing::warn!("Browser did not shut down cleanly: {}", e);
    }

    report
}
