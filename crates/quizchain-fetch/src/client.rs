//! Thin async HTTP client over reqwest.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION, SET_COOKIE};

use crate::error::Result;

const USER_AGENT: &str = concat!("quizchain/", env!("CARGO_PKG_VERSION"));

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpBody {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub location: Option<String>,
    pub set_cookies: Vec<String>,
    pub bytes: Vec<u8>,
}

impl HttpBody {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    async fn read(resp: reqwest::Response) -> Result<Self> {
        let status = resp.status().as_u16();
        let headers = resp.headers();
        let header = |name| {
            headers
                .get(name)
                .and_then(|v: &reqwest::header::HeaderValue| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE);
        let content_disposition = header(CONTENT_DISPOSITION);
        let location = header(LOCATION);
        let set_cookies = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let bytes = resp.bytes().await?.to_vec();

        Ok(Self {
            status,
            content_type,
            content_disposition,
            location,
            set_cookies,
            bytes,
        })
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// GET following redirects.
    pub async fn get(&self, url: &str, timeout: Duration) -> Result<HttpBody> {
        let resp = self.client.get(url).timeout(timeout).send().await?;
        HttpBody::read(resp).await
    }

    /// GET carrying a `Cookie` header from an earlier response.
    pub async fn get_with_cookie(
        &self,
        url: &str,
        cookie: &str,
        timeout: Duration,
    ) -> Result<HttpBody> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::COOKIE, cookie)
            .timeout(timeout)
            .send()
            .await?;
        HttpBody::read(resp).await
    }

    /// POST a JSON body.
    pub async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpBody> {
        let resp = self
            .client
            .post(url)
            .json(body)
            .timeout(timeout)
            .send()
            .await?;
        HttpBody::read(resp).await
    }

    /// Single GET against an address validated by the guard.
    ///
    /// Redirects are not followed; the caller re-checks each hop.
    pub async fn get_pinned(
        &self,
        url: &str,
        domain: Option<&str>,
        addr: SocketAddr,
        timeout: Duration,
    ) -> Result<HttpBody> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT);
        if let Some(domain) = domain {
            builder = builder.resolve(domain, addr);
        }
        let pinned = builder.build()?;

        let resp = pinned.get(url).timeout(timeout).send().await?;
        HttpBody::read(resp).await
    }
}
