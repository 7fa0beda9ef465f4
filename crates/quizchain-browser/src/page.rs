use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A resource fetched through the browser's own session
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedResource {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A browser tab under the engine's control.
///
/// Every method is a blocking suspension point for the caller; none are
/// cancelled by the overall solve deadline.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Load `url`, failing if it has not finished within `timeout`
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Serialized DOM of the current document
    async fn html(&self) -> Result<String>;

    /// Rendered, visible text of the document body
    async fn visible_text(&self) -> Result<String>;

    /// Rendered text of every element matching a CSS selector
    async fn select_texts(&self, selector: &str) -> Result<Vec<String>>;

    /// Fetch a URL with the page's cookies and credentials
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedResource>;
}
