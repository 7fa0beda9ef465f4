use crate::OutputFormat;
use anyhow::{Context, Result};
use quizchain_detectors::content::{
    CANDIDATE_SELECTORS, candidate_blocks, embedded_payload, selector_texts,
};
use quizchain_detectors::{ResolvedEndpoint, ResolverInput, SubmitResolver};
use quizchain_fetch::EndpointProber;
use serde_json::json;
use std::path::Path;
use url::Url;

/// Run the static resolver steps over a saved page
pub fn resolve_file(html_file: &Path, page_url: &str) -> Result<Option<ResolvedEndpoint>> {
    let html = std::fs::read_to_string(html_file)
        .with_context(|| format!("Failed to read {}", html_file.display()))?;
    let page_url = Url::parse(page_url).with_context(|| format!("Invalid page URL: {page_url}"))?;

    let texts = selector_texts(&html, CANDIDATE_SELECTORS);
    let blocks = candidate_blocks(&texts, &html);
    let payload = embedded_payload(&blocks);

    Ok(SubmitResolver::resolve(&ResolverInput {
        page_url: &page_url,
        html: &html,
        blocks: &blocks,
        payload: payload.as_ref(),
    }))
}

pub fn execute(html_file: &Path, page_url: &str, format: OutputFormat) -> Result<()> {
    let resolved = resolve_file(html_file, page_url)?;

    match format {
        OutputFormat::Json => {
            let body = match &resolved {
                Some(endpoint) => json!({ "endpoint": endpoint.url, "step": endpoint.step }),
                None => json!({ "endpoint": null, "step": null }),
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Pretty => match resolved {
            Some(endpoint) => println!("{} ({:?})", endpoint.url, endpoint.step),
            None => {
                use console::style;

                println!("none");
                // page_url was validated by resolve_file
                if let Ok(url) = Url::parse(page_url) {
                    println!("{}", style("A live run would probe:").dim());
                    for candidate in EndpointProber::candidates(&url) {
                        println!("  {}", style(candidate).dim());
                    }
                }
            }
        },
    }

    Ok(())
}
