//! The page-to-page loop.
//!
//! One iteration navigates, captures, downloads, derives, resolves and
//! submits. Every outcome, including failures, becomes a
//! [`PageVisitResult`]; the loop itself never errors.

use std::sync::Arc;

use quizchain_browser::BrowserPage;
use quizchain_core::dump::{DebugSink, FsDumpSink};
use quizchain_core::{PageVisitResult, SubmitResponse};
use quizchain_detectors::{AnswerPipeline, ResolverInput, SubmitResolver};
use quizchain_fetch::{
    AssetCollector, DriveFetcher, EndpointProber, HttpClient, RemoteTranscriber, SubmitPayload,
    post_answer,
};
use tokio::time::Instant;
use url::Url;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::report::{SolveReport, StopReason};
use crate::session::QuizSession;
use crate::snapshot::PageSnapshot;

/// Result of one iteration
enum Step {
    Continue(PageVisitResult, String),
    Stop(PageVisitResult, StopReason),
}

pub struct Orchestrator {
    config: EngineConfig,
    http: HttpClient,
    pipeline: AnswerPipeline,
    assets: AssetCollector,
    prober: EndpointProber,
    sink: Option<Arc<dyn DebugSink>>,
}

impl Orchestrator {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let http = HttpClient::new()?;
        let drive =
            DriveFetcher::with_endpoint(http.clone(), &config.drive_endpoint, config.asset_timeout);
        let assets = AssetCollector::new(http.clone(), drive, config.asset_timeout);
        let prober = EndpointProber::new(http.clone(), config.probe_timeout);

        let mut pipeline = AnswerPipeline::standard();
        if let Some(t) = &config.transcription {
            pipeline = pipeline.with_transcriber(Arc::new(RemoteTranscriber::new(
                &t.base_url,
                t.api_key.clone(),
                t.model.clone(),
            )));
        }

        let sink = config.dump_dir.as_ref().map(|dir| {
            tracing::info!("Dumping visited pages to {}", dir.display());
            Arc::new(FsDumpSink::new(dir.clone())) as Arc<dyn DebugSink>
        });

        Ok(Self {
            config,
            http,
            pipeline,
            assets,
            prober,
            sink,
        })
    }

    pub fn with_pipeline(mut self, pipeline: AnswerPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DebugSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Drive the chain until a dead end, a terminal failure or the deadline.
    ///
    /// The deadline is checked between iterations only; an iteration in
    /// flight runs to completion under its own per-operation timeouts.
    pub async fn run(&self, page: &mut dyn BrowserPage, mut session: QuizSession) -> SolveReport {
        let started = Instant::now();

        let stop_reason = loop {
            if !session.has_url() {
                break StopReason::EmptyUrl;
            }
            if session.expired() {
                tracing::info!("Deadline reached after {} pages", session.results.len());
                break StopReason::Deadline;
            }

            match self.visit(page, &session).await {
                Step::Continue(result, next_url) => {
                    session.results.push(result);
                    tracing::info!("Following next URL {}", next_url);
                    session.current_url = next_url;
                }
                Step::Stop(result, reason) => {
                    session.results.push(result);
                    break reason;
                }
            }
        };

        SolveReport {
            results: session.results,
            stop_reason,
            elapsed_seconds: started.elapsed().as_secs_f64(),
        }
    }

    async fn visit(&self, page: &mut dyn BrowserPage, session: &QuizSession) -> Step {
        let current = session.current_url.as_str();
        tracing::info!(
            "Visiting {} ({}s left)",
            current,
            session.remaining().as_secs()
        );

        let page_url = match Url::parse(current) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot visit {}: {}", current, e);
                return Step::Stop(
                    PageVisitResult::navigation_failed(current, format!("invalid URL: {e}")),
                    StopReason::NavigationFailed,
                );
            }
        };

        if let Err(e) = page.navigate(current, self.config.navigation_timeout).await {
            tracing::warn!("Navigation to {} failed: {}", current, e);
            return Step::Stop(
                PageVisitResult::navigation_failed(current, e.to_string()),
                StopReason::NavigationFailed,
            );
        }

        let page: &dyn BrowserPage = page;
        let snapshot = PageSnapshot::capture(page).await;
        let assets = self.assets.collect(page, &page_url, &snapshot.hrefs).await;

        if let Some(sink) = &self.sink {
            sink.record_page(current, &snapshot.html, &assets);
        }

        let candidate = self
            .pipeline
            .derive(snapshot.derivation_text(), &assets)
            .await;
        tracing::info!("Derived answer via {}", candidate.method);

        let payload = SubmitPayload {
            email: session.email.clone(),
            secret: session.secret.clone(),
            url: current.to_string(),
            answer: candidate.value.to_json(),
        };

        let resolved = SubmitResolver::resolve(&ResolverInput {
            page_url: &page_url,
            html: &snapshot.html,
            blocks: &snapshot.blocks,
            payload: snapshot.payload.as_ref(),
        });

        let (endpoint, response) = match resolved {
            Some(endpoint) => {
                let response =
                    post_answer(&self.http, &endpoint.url, &payload, self.config.submit_timeout)
                        .await;
                (endpoint.url, response)
            }
            None => match self.prober.probe(&page_url, &payload).await {
                Some(hit) => (hit.endpoint, hit.response),
                None => {
                    tracing::warn!("No submit endpoint found for {}", current);
                    return Step::Stop(
                        PageVisitResult::no_submit_url(current, candidate),
                        StopReason::NoSubmitUrl,
                    );
                }
            },
        };

        log_response(&response);
        let next = response.resolve_next_url(current);
        let result = PageVisitResult::submitted(current, endpoint, candidate, response);

        match next {
            Some(next_url) => Step::Continue(result, next_url),
            None => Step::Stop(result, StopReason::DeadEnd),
        }
    }
}

fn log_response(response: &SubmitResponse) {
    match response {
        SubmitResponse::Json(value) => tracing::info!("Submit response: {}", value),
        other => tracing::info!("Submit response (degraded): {}", other.to_json()),
    }
}
