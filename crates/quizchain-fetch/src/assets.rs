//! Discovery and download of files linked from a quiz page.
//!
//! Every link takes exactly one route: the browser session for the page's
//! own origin, the drive fetcher for share links, and a guarded direct GET
//! for everything else. Failures on one link never affect the others.

use std::collections::HashSet;
use std::time::Duration;

use quizchain_browser::BrowserPage;
use quizchain_core::{AssetKind, DownloadedAsset};
use url::Url;

use crate::client::{HttpBody, HttpClient};
use crate::drive::{DriveFetcher, disposition_filename, drive_file_id};
use crate::error::{Error, Result};
use crate::guard::SsrfGuard;

const MAX_REDIRECTS: usize = 5;
const SKIPPED_SCHEMES: &[&str] = &["javascript", "mailto", "tel", "data"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionRoute {
    BrowserSession,
    Drive(String),
    Direct,
}

/// Resolve hrefs against the page URL, dropping duplicates, the page
/// itself and pseudo-links.
pub fn candidate_links(page_url: &Url, hrefs: &[String]) -> Vec<Url> {
    let mut page = page_url.clone();
    page.set_fragment(None);

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in hrefs {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        let Ok(mut link) = page_url.join(href) else {
            tracing::debug!("Skipping unparseable link {}", href);
            continue;
        };
        if SKIPPED_SCHEMES.contains(&link.scheme()) {
            continue;
        }
        if link.scheme() != "http" && link.scheme() != "https" {
            continue;
        }

        link.set_fragment(None);
        if link == page {
            continue;
        }
        if seen.insert(link.to_string()) {
            links.push(link);
        }
    }

    links
}

pub fn route_for(page_url: &Url, link: &Url) -> AcquisitionRoute {
    if let Some(id) = drive_file_id(link) {
        return AcquisitionRoute::Drive(id);
    }
    if link.origin() == page_url.origin() {
        return AcquisitionRoute::BrowserSession;
    }
    AcquisitionRoute::Direct
}

pub struct AssetCollector {
    http: HttpClient,
    guard: SsrfGuard,
    drive: DriveFetcher,
    timeout: Duration,
}

impl AssetCollector {
    pub fn new(http: HttpClient, drive: DriveFetcher, timeout: Duration) -> Self {
        Self {
            http,
            guard: SsrfGuard::new(),
            drive,
            timeout,
        }
    }

    /// Download every fetchable link, in page order.
    pub async fn collect(
        &self,
        page: &dyn BrowserPage,
        page_url: &Url,
        hrefs: &[String],
    ) -> Vec<DownloadedAsset> {
        let mut assets = Vec::new();

        for link in candidate_links(page_url, hrefs) {
            match self.acquire(page, page_url, &link).await {
                Ok(Some(asset)) => {
                    tracing::debug!(
                        "Collected {} asset {} ({} bytes)",
                        asset.kind,
                        asset.filename,
                        asset.bytes.len()
                    );
                    assets.push(asset);
                }
                Ok(None) => {}
                Err(Error::Guard(rejection)) => {
                    tracing::warn!("Not fetching {}: {}", link, rejection);
                }
                Err(e) => {
                    tracing::debug!("Failed to fetch {}: {}", link, e);
                }
            }
        }

        assets
    }

    async fn acquire(
        &self,
        page: &dyn BrowserPage,
        page_url: &Url,
        link: &Url,
    ) -> Result<Option<DownloadedAsset>> {
        match route_for(page_url, link) {
            AcquisitionRoute::BrowserSession => {
                let resource = page.fetch(link.as_str(), self.timeout).await?;
                if resource.status != 200 {
                    return Ok(None);
                }
                let kind = AssetKind::classify(link.as_str(), resource.content_type.as_deref());
                Ok(Some(DownloadedAsset::new(kind, link.as_str(), resource.bytes)))
            }
            AcquisitionRoute::Drive(id) => {
                let body = self.drive.fetch(&id).await?;
                let filename = body
                    .content_disposition
                    .as_deref()
                    .and_then(disposition_filename);
                let kind = AssetKind::from_extension(filename.as_deref().unwrap_or_default())
                    .or_else(|| body.content_type.as_deref().and_then(AssetKind::from_content_type))
                    .unwrap_or(AssetKind::Binary);

                let mut asset = DownloadedAsset::new(kind, link.as_str(), body.bytes);
                if let Some(name) = filename {
                    asset.filename = name;
                }
                Ok(Some(asset))
            }
            AcquisitionRoute::Direct => {
                let body = self.fetch_direct(link).await?;
                if !body.is_ok() {
                    return Ok(None);
                }
                let kind = AssetKind::classify(link.as_str(), body.content_type.as_deref());
                Ok(Some(DownloadedAsset::new(kind, link.as_str(), body.bytes)))
            }
        }
    }

    /// GET `url` directly, checking the guard on every redirect hop.
    pub async fn fetch_direct(&self, url: &Url) -> Result<HttpBody> {
        let mut current = url.clone();

        for _ in 0..=MAX_REDIRECTS {
            let target = self.guard.check(&current).await?;
            let body = self
                .http
                .get_pinned(
                    target.url.as_str(),
                    target.domain.as_deref(),
                    target.addr,
                    self.timeout,
                )
                .await?;

            if !(300..400).contains(&body.status) {
                return Ok(body);
            }

            let Some(location) = body.location.as_deref() else {
                return Ok(body);
            };
            current = current
                .join(location)
                .map_err(|e| Error::InvalidUrl(format!("{location}: {e}")))?;
            tracing::debug!("Following redirect to {}", current);
        }

        Err(Error::Redirects(url.to_string()))
    }
}
