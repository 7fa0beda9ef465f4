//! Two-step download from a cloud-drive share.
//!
//! Large files answer the first request with an interstitial page and a
//! `download_warning*` cookie; the download proceeds once the token is
//! echoed back as `confirm=`.

use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::client::{HttpBody, HttpClient};
use crate::error::{Error, Result};

pub const DEFAULT_DRIVE_ENDPOINT: &str = "https://docs.google.com/uc";

lazy_static! {
    static ref FILE_PATH_ID: Regex = Regex::new(r"/file/d/([A-Za-z0-9_\-]+)").unwrap();
    static ref CONFIRM_MARKER: Regex =
        Regex::new(r#"confirm=([0-9A-Za-z_\-]+)|name="confirm"\s+value="([0-9A-Za-z_\-]+)""#)
            .unwrap();
}

/// Extract the file identifier from a drive share link.
pub fn drive_file_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if host != "drive.google.com" && host != "docs.google.com" {
        return None;
    }

    if let Some(caps) = FILE_PATH_ID.captures(url.path()) {
        return Some(caps[1].to_string());
    }

    url.query_pairs()
        .find(|(k, _)| k == "id")
        .map(|(_, v)| v.into_owned())
        .filter(|id| !id.is_empty())
}

pub struct DriveFetcher {
    client: HttpClient,
    endpoint: String,
    timeout: Duration,
}

impl DriveFetcher {
    pub fn new(client: HttpClient, timeout: Duration) -> Self {
        Self::with_endpoint(client, DEFAULT_DRIVE_ENDPOINT, timeout)
    }

    pub fn with_endpoint(client: HttpClient, endpoint: &str, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            timeout,
        }
    }

    fn download_url(&self, file_id: &str, confirm: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.endpoint)))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("export", "download");
            query.append_pair("id", file_id);
            if let Some(token) = confirm {
                query.append_pair("confirm", token);
            }
        }
        Ok(url)
    }

    pub async fn fetch(&self, file_id: &str) -> Result<HttpBody> {
        let first_url = self.download_url(file_id, None)?;
        tracing::debug!("Drive download {}", first_url);
        let first = self.client.get(first_url.as_str(), self.timeout).await?;

        let body = match confirm_token(&first) {
            Some((token, cookie)) => {
                tracing::debug!("Drive confirmation required for {}", file_id);
                let second_url = self.download_url(file_id, Some(&token))?;
                match cookie {
                    Some(cookie) => {
                        self.client
                            .get_with_cookie(second_url.as_str(), &cookie, self.timeout)
                            .await?
                    }
                    None => self.client.get(second_url.as_str(), self.timeout).await?,
                }
            }
            None => first,
        };

        if !(200..300).contains(&body.status) {
            return Err(Error::Drive(format!(
                "file {} answered with status {}",
                file_id, body.status
            )));
        }

        Ok(body)
    }
}

/// The confirmation token and the cookie pair that carried it, if any.
fn confirm_token(resp: &HttpBody) -> Option<(String, Option<String>)> {
    for raw in &resp.set_cookies {
        let pair = raw.split(';').next().unwrap_or_default().trim();
        if let Some((name, value)) = pair.split_once('=') {
            if name.starts_with("download_warning") && !value.is_empty() {
                return Some((value.to_string(), Some(pair.to_string())));
            }
        }
    }

    let is_html = resp
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("text/html"));
    if !is_html {
        return None;
    }

    let text = resp.text();
    CONFIRM_MARKER.captures(&text).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| (m.as_str().to_string(), None))
    })
}

/// Filename announced by a `Content-Disposition` header.
pub fn disposition_filename(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        part.strip_prefix("filename=")
            .map(|name| name.trim_matches('"').to_string())
            .filter(|name| !name.is_empty())
    })
}
