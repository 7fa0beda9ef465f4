//! What the loop reads from a page after navigation.

use quizchain_browser::BrowserPage;
use quizchain_detectors::content::{CANDIDATE_SELECTORS, anchor_hrefs, candidate_blocks, embedded_payload};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    pub html: String,
    pub visible_text: String,
    pub selector_texts: Vec<String>,
    pub hrefs: Vec<String>,
    pub blocks: Vec<String>,
    pub payload: Option<Map<String, Value>>,
}

impl PageSnapshot {
    /// Read the current document; unreadable parts are left empty.
    pub async fn capture(page: &dyn BrowserPage) -> Self {
        let html = page.html().await.unwrap_or_else(|e| {
            tracing::warn!("Could not read page HTML: {}", e);
            String::new()
        });
        let visible_text = page.visible_text().await.unwrap_or_else(|e| {
            tracing::debug!("Could not read visible text: {}", e);
            String::new()
        });
        let selector_texts = page
            .select_texts(CANDIDATE_SELECTORS)
            .await
            .unwrap_or_else(|e| {
                tracing::debug!("Selector query failed: {}", e);
                Vec::new()
            });

        Self::from_parts(html, visible_text, selector_texts)
    }

    pub fn from_parts(html: String, visible_text: String, selector_texts: Vec<String>) -> Self {
        let hrefs = anchor_hrefs(&html);
        let blocks = candidate_blocks(&selector_texts, &html);
        let payload = embedded_payload(&blocks);

        Self {
            html,
            visible_text,
            selector_texts,
            hrefs,
            blocks,
            payload,
        }
    }

    /// Text handed to answer derivation
    pub fn derivation_text(&self) -> &str {
        if self.visible_text.trim().is_empty() {
            &self.html
        } else {
            &self.visible_text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_collects_links_and_payload() {
        let html = r#"<a href="a.csv">a</a><pre>{"url": "/submit", "answer": 1}</pre>"#;
        let snapshot = PageSnapshot::from_parts(
            html.to_string(),
            "Download a".to_string(),
            vec![r#"{"url": "/submit", "answer": 1}"#.to_string()],
        );

        assert_eq!(snapshot.hrefs, vec!["a.csv".to_string()]);
        assert_eq!(snapshot.payload.as_ref().unwrap()["url"], "/submit");
        assert_eq!(snapshot.derivation_text(), "Download a");
    }

    #[test]
    fn test_derivation_text_falls_back_to_html() {
        let snapshot = PageSnapshot::from_parts("<p>sum 1 2</p>".to_string(), " ".to_string(), vec![]);
        assert_eq!(snapshot.derivation_text(), "<p>sum 1 2</p>");
    }
}
