use crate::{BrowserPage, Error, FetchedResource, LaunchOptions, ProfileManager, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// A running Chromium process owned by one solve invocation
pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    _profile: ProfileManager,
}

impl ChromiumSession {
    /// Launch the browser and start pumping CDP events
    pub async fn launch(options: &LaunchOptions, profile: ProfileManager) -> Result<Self> {
        tracing::info!(
            "Launching browser {} (headless: {})",
            options.chrome_path.display(),
            options.headless
        );

        let config = options.build_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Browser(format!("Failed to launch browser: {}", e)))?;

        // The handler must be polled for any page command to complete
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
            _profile: profile,
        })
    }

    /// Open a blank tab
    pub async fn new_page(&self) -> Result<ChromiumPage> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(ChromiumPage { page })
    }

    /// Shut the browser down and remove its profile
    pub async fn close(mut self) -> Result<()> {
        let result = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        tracing::debug!("Browser session closed");
        result.map(|_| ()).map_err(Error::from)
    }
}

/// A Chromium tab
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    async fn eval<T: DeserializeOwned>(&self, expression: String) -> Result<T> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(Error::Script)?;

        let result = self.page.evaluate_expression(params).await?;
        result
            .into_value()
            .map_err(|e| Error::Script(format!("Failed to convert script result: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct ScriptFetch {
    status: u16,
    #[serde(rename = "contentType")]
    content_type: Option<String>,
    body: String,
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let start = Instant::now();

        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(Error::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return Err(Error::Timeout {
                    operation: "navigation",
                    after_ms: timeout.as_millis(),
                });
            }
        }

        let remaining = timeout.saturating_sub(start.elapsed());
        if tokio::time::timeout(remaining, self.page.wait_for_navigation())
            .await
            .is_err()
        {
            tracing::debug!("Page {} still loading after navigation timeout", url);
        }

        tracing::debug!("Loaded {} in {}ms", url, start.elapsed().as_millis());
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        self.eval("document.documentElement.outerHTML".to_string())
            .await
    }

    async fn visible_text(&self) -> Result<String> {
        self.eval("document.body ? document.body.innerText : ''".to_string())
            .await
    }

    async fn select_texts(&self, selector: &str) -> Result<Vec<String>> {
        let selector = serde_json::to_string(selector)
            .map_err(|e| Error::Script(e.to_string()))?;
        let script = format!(
            "Array.from(document.querySelectorAll({selector})).map(e => e.innerText || e.textContent || '')"
        );
        self.eval(script).await
    }

    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedResource> {
        let target = serde_json::to_string(url).map_err(|e| Error::Script(e.to_string()))?;
        let script = format!(
            r#"(async () => {{
                const resp = await fetch({target}, {{ credentials: 'include' }});
                const buf = new Uint8Array(await resp.arrayBuffer());
                let bin = '';
                for (let i = 0; i < buf.length; i += 0x8000) {{
                    bin += String.fromCharCode.apply(null, buf.subarray(i, i + 0x8000));
                }}
                return {{ status: resp.status, contentType: resp.headers.get('content-type'), body: btoa(bin) }};
            }})()"#
        );

        let fetched: ScriptFetch = tokio::time::timeout(timeout, self.eval(script))
            .await
            .map_err(|_| Error::Timeout {
                operation: "in-page fetch",
                after_ms: timeout.as_millis(),
            })??;

        let bytes = STANDARD
            .decode(fetched.body.as_bytes())
            .map_err(|e| Error::Script(format!("Invalid fetch body encoding: {}", e)))?;

        Ok(FetchedResource {
            status: fetched.status,
            content_type: fetched.content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChromeFinder;

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_page_reads_rendered_text() {
        let chrome = ChromeFinder::new(None).find().expect("chrome not found");
        let profile = ProfileManager::temporary().unwrap();
        let options = LaunchOptions::new(chrome, profile.path().to_path_buf());
        let session = ChromiumSession::launch(&options, profile).await.unwrap();
        let mut page = session.new_page().await.unwrap();

        page.navigate(
            "data:text/html,<h1>Quiz</h1><pre>{\"answer\": 42}</pre>",
            Duration::from_secs(10),
        )
        .await
        .unwrap();

        let text = page.visible_text().await.unwrap();
        assert!(text.contains("Quiz"));

        let blocks = page.select_texts("pre").await.unwrap();
        assert_eq!(blocks, vec!["{\"answer\": 42}".to_string()]);

        session.close().await.unwrap();
    }
}
