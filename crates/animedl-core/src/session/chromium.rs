//! Chrome/Chromium session driven over the DevTools protocol.

use chromiumoxide::cdp::browser_protocol::target::TargetId;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use std::collections::HashSet;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::error::{is_network_failure, is_transient_lookup};
use super::{BrowserSession, SessionError};
use crate::config::BrowserOptions;

const IMAGES_OFF: &str = "--blink-settings=imagesEnabled=false";
const TAB_POLL: Duration = Duration::from_millis(200);

/// A launched browser plus the page the resolver is currently driving.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    known_targets: HashSet<TargetId>,
    handler: JoinHandle<()>,
}

impl ChromiumSession {
    /// Launches a fresh browser and opens a blank page.
    ///
    /// `request_timeout` caps every DevTools request, navigation included.
    pub async fn launch(
        options: &BrowserOptions,
        request_timeout: Duration,
    ) -> Result<Self, SessionError> {
        let mut builder = BrowserConfig::builder().request_timeout(request_timeout);
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(exe) = &options.executable {
            builder = builder.chrome_executable(exe);
        }
        if options.disable_images {
            builder = builder.arg(IMAGES_OFF);
        }
        for arg in &options.args {
            builder = builder.arg(arg.as_str());
        }
        let config = builder.build().map_err(SessionError::Driver)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SessionError::Driver(format!("launch browser: {e}")))?;
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });
        tracing::debug!(headless = options.headless, "browser launched");

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    tracing::warn!("closing browser after failed launch: {close_err}");
                }
                handler.abort();
                return Err(SessionError::Driver(format!("open page: {e}")));
            }
        };
        let known_targets = match browser.pages().await {
            Ok(pages) => pages.iter().map(|p| p.target_id().clone()).collect(),
            Err(_) => HashSet::from([page.target_id().clone()]),
        };

        Ok(Self {
            browser,
            page,
            known_targets,
            handler,
        })
    }
}

fn classify(e: CdpError) -> SessionError {
    match e {
        CdpError::Timeout => SessionError::Timeout("devtools request timed out".to_string()),
        CdpError::NotFound => SessionError::NotFound("no such node".to_string()),
        other => {
            let msg = other.to_string();
            if is_network_failure(&msg) {
                SessionError::Unreachable(msg)
            } else if is_transient_lookup(&msg) {
                SessionError::NotFound(msg)
            } else {
                SessionError::Driver(msg)
            }
        }
    }
}

impl BrowserSession for ChromiumSession {
    type Element = Element;

    async fn goto(&mut self, url: &str, bound: Duration) -> Result<(), SessionError> {
        match tokio::time::timeout(bound, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(classify(e)),
            Err(_) => Err(SessionError::Timeout(format!("load {url} after {bound:?}"))),
        }
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<Element>, SessionError> {
        match self.page.find_elements(selector).await.map_err(classify) {
            Ok(elements) => Ok(elements),
            // No match yet, or the page is between documents.
            Err(SessionError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn type_text(&mut self, element: &Element, text: &str) -> Result<(), SessionError> {
        element.click().await.map_err(classify)?;
        element.type_str(text).await.map_err(classify)?;
        Ok(())
    }

    async fn press_enter(&mut self, element: &Element) -> Result<(), SessionError> {
        element.press_key("Enter").await.map_err(classify)?;
        Ok(())
    }

    async fn click(&mut self, element: &Element) -> Result<(), SessionError> {
        element.click().await.map_err(classify)?;
        Ok(())
    }

    async fn wait_for_navigation(&mut self, bound: Duration) -> Result<(), SessionError> {
        match tokio::time::timeout(bound, self.page.wait_for_navigation()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(classify(e)),
            Err(_) => Err(SessionError::Timeout(format!(
                "navigation still running after {bound:?}"
            ))),
        }
    }

    async fn attribute(
        &mut self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        element.attribute(name).await.map_err(classify)
    }

    async fn current_url(&mut self) -> Result<Option<String>, SessionError> {
        self.page.url().await.map_err(classify)
    }

    async fn switch_to_new_tab(&mut self, bound: Duration) -> Result<(), SessionError> {
        let deadline = Instant::now() + bound;
        loop {
            let pages = self.browser.pages().await.map_err(classify)?;
            if let Some(page) = pages
                .into_iter()
                .rev()
                .find(|p| !self.known_targets.contains(p.target_id()))
            {
                self.known_targets.insert(page.target_id().clone());
                self.page = page;
                tracing::debug!("switched to newly opened tab");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SessionError::Timeout(format!(
                    "no new tab opened within {bound:?}"
                )));
            }
            tokio::time::sleep(TAB_POLL).await;
        }
    }

    async fn close(mut self) -> Result<(), SessionError> {
        let closed = self.browser.close().await.map_err(classify);
        if closed.is_ok() {
            if let Err(e) = self.browser.wait().await {
                tracing::warn!("waiting for browser exit: {e}");
            }
        }
        self.handler.abort();
        closed.map(|_| ())
    }
}
