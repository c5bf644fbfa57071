//! The individual navigation steps of a resolution.

use std::time::Duration;

use super::episode::reverse_index;
use super::error::ResolutionError;
use super::link::absolutize;
use super::EpisodeLinkResolver;
use crate::navigation::NavigationState;
use crate::query::ResolvedLink;
use crate::session::{wait_for_elements, BrowserSession, SessionError};
use crate::site::{DownloadPageMode, SubmitMode};

/// Treats a timeout as success; the page usually settles regardless.
fn tolerate_timeout(result: Result<(), SessionError>, what: &str) -> Result<(), SessionError> {
    match result {
        Err(SessionError::Timeout(msg)) => {
            tracing::warn!("{what} timed out, continuing: {msg}");
            Ok(())
        }
        other => other,
    }
}

fn browser_error(stage: NavigationState) -> impl FnOnce(SessionError) -> ResolutionError {
    move |source| ResolutionError::Browser { stage, source }
}

fn take_at<E>(mut elements: Vec<E>, index: usize) -> Option<E> {
    (index < elements.len()).then(|| elements.swap_remove(index))
}

impl EpisodeLinkResolver {
    async fn wait_for<S: BrowserSession>(
        &self,
        session: &mut S,
        selector: &str,
        min_count: usize,
        bound: Duration,
        stage: NavigationState,
    ) -> Result<Vec<S::Element>, ResolutionError> {
        wait_for_elements(session, selector, min_count, bound, self.waits.poll_interval())
            .await
            .map_err(|e| match e {
                SessionError::Timeout(_) => ResolutionError::ElementNotFound {
                    stage,
                    selector: selector.to_string(),
                    waited: bound,
                },
                other => ResolutionError::Browser {
                    stage,
                    source: other,
                },
            })
    }

    /// Blocks until the navigation just triggered has finished. Timeouts are tolerated.
    async fn settle<S: BrowserSession>(
        &self,
        session: &mut S,
        what: &str,
        stage: NavigationState,
    ) -> Result<(), ResolutionError> {
        let waited = session.wait_for_navigation(self.waits.page_load()).await;
        tolerate_timeout(waited, what).map_err(browser_error(stage))
    }

    async fn wait_for_first<S: BrowserSession>(
        &self,
        session: &mut S,
        selector: &str,
        stage: NavigationState,
    ) -> Result<S::Element, ResolutionError> {
        let bound = self.waits.interactive();
        let found = self.wait_for(session, selector, 1, bound, stage).await?;
        take_at(found, 0).ok_or_else(|| ResolutionError::ElementNotFound {
            stage,
            selector: selector.to_string(),
            waited: bound,
        })
    }

    /// Loads the landing page. Only an outright navigation failure is fatal.
    pub(super) async fn load_home<S: BrowserSession>(
        &self,
        session: &mut S,
    ) -> Result<(), ResolutionError> {
        let url = &self.profile.base_url;
        tracing::info!("loading {url}");
        match session.goto(url, self.waits.page_load()).await {
            Ok(()) => tracing::info!("landing page loaded"),
            Err(SessionError::Timeout(msg)) => {
                tracing::warn!("landing page still loading, continuing: {msg}")
            }
            Err(e) => {
                let reason = match e {
                    SessionError::Unreachable(reason) => reason,
                    other => other.to_string(),
                };
                tracing::error!("cannot reach {url}: {reason}");
                return Err(ResolutionError::SiteUnreachable {
                    url: url.clone(),
                    reason,
                });
            }
        }
        Ok(())
    }

    pub(super) async fn submit_search<S: BrowserSession>(
        &self,
        session: &mut S,
        title: &str,
        stage: NavigationState,
    ) -> Result<(), ResolutionError> {
        tracing::info!("locating the search box");
        let input = self.wait_for_first(session, &self.profile.search_input, stage).await?;
        tracing::info!("searching for {title:?}");
        session
            .type_text(&input, title)
            .await
            .map_err(browser_error(stage))?;

        let submitted = match self.profile.submit_mode {
            SubmitMode::Enter => session.press_enter(&input).await,
            SubmitMode::Button => {
                let button = self
                    .wait_for_first(session, &self.profile.search_submit, stage)
                    .await?;
                session.click(&button).await
            }
        };
        tolerate_timeout(submitted, "search submit").map_err(browser_error(stage))?;
        self.settle(session, "search results load", stage).await
    }

    /// Takes the first search result as-is; there is no ranking.
    pub(super) async fn select_first_result<S: BrowserSession>(
        &self,
        session: &mut S,
        stage: NavigationState,
    ) -> Result<(), ResolutionError> {
        tracing::info!("opening the first search result");
        let first = self.wait_for_first(session, &self.profile.result_links, stage).await?;
        tolerate_timeout(session.click(&first).await, "opening search result")
            .map_err(browser_error(stage))?;
        self.settle(session, "episode list load", stage).await?;
        tracing::info!("episode list page opened");
        Ok(())
    }

    /// Clicks episode `episode`, counted from the end of the episode list.
    pub(super) async fn select_episode<S: BrowserSession>(
        &self,
        session: &mut S,
        episode: u32,
        stage: NavigationState,
    ) -> Result<(), ResolutionError> {
        tracing::info!("locating episode {episode}");
        let selector = &self.profile.episode_links;
        let bound = self.waits.interactive();
        let wanted = usize::try_from(episode).unwrap_or(usize::MAX);
        let not_found = || ResolutionError::ElementNotFound {
            stage,
            selector: format!("{selector} (episode {episode} from the end)"),
            waited: bound,
        };

        let episodes = self
            .wait_for(session, selector, wanted, bound, stage)
            .await
            .map_err(|e| match e {
                ResolutionError::ElementNotFound { .. } => not_found(),
                other => other,
            })?;
        let total = episodes.len();
        let index = reverse_index(total, episode).ok_or_else(not_found)?;
        let target = take_at(episodes, index).ok_or_else(not_found)?;

        tracing::debug!(position = index + 1, of = total, "episode entry chosen");
        tolerate_timeout(session.click(&target).await, "opening episode")
            .map_err(browser_error(stage))?;
        self.settle(session, "episode page load", stage).await?;
        tracing::info!("episode {episode} opened");
        Ok(())
    }

    /// Follows the downloads anchor. Navigation timeouts here are ignored.
    pub(super) async fn open_download_page<S: BrowserSession>(
        &self,
        session: &mut S,
        stage: NavigationState,
    ) -> Result<(), ResolutionError> {
        let anchor_selector = &self.profile.downloads_anchor;
        let anchor = self.wait_for_first(session, anchor_selector, stage).await?;

        match self.profile.download_page_mode {
            DownloadPageMode::Href => {
                let missing_href = || ResolutionError::ElementNotFound {
                    stage,
                    selector: format!("{anchor_selector}[href]"),
                    waited: self.waits.interactive(),
                };
                let href = session
                    .attribute(&anchor, "href")
                    .await
                    .map_err(browser_error(stage))?
                    .ok_or_else(missing_href)?;
                let base = match session.current_url().await {
                    Ok(Some(current)) => current,
                    _ => self.profile.base_url.clone(),
                };
                let target = absolutize(&base, &href).ok_or_else(missing_href)?;

                tracing::info!("navigating to the download page {target}");
                tolerate_timeout(
                    session.goto(&target, self.waits.page_load()).await,
                    "download page load",
                )
                .map_err(browser_error(stage))?;
            }
            DownloadPageMode::Tab => {
                tracing::info!("opening the download page in a new tab");
                tolerate_timeout(session.click(&anchor).await, "downloads click")
                    .map_err(browser_error(stage))?;
                tolerate_timeout(
                    session.switch_to_new_tab(self.waits.interactive()).await,
                    "switching to the download tab",
                )
                .map_err(browser_error(stage))?;
            }
        }
        Ok(())
    }

    /// Reads the quality-tier link. Every failure here becomes `LinkNotFound`.
    pub(super) async fn extract_link<S: BrowserSession>(
        &self,
        session: &mut S,
    ) -> Result<ResolvedLink, ResolutionError> {
        let quality = &self.profile.quality.label;
        tracing::info!("extracting the {quality} download link");
        match self.read_quality_link(session).await {
            Ok(url) => Ok(ResolvedLink {
                url,
                quality_label: quality.clone(),
            }),
            Err(SessionError::Timeout(msg)) => {
                tracing::error!("{quality} link did not appear: {msg}");
                Err(ResolutionError::LinkNotFound {
                    quality: quality.clone(),
                })
            }
            Err(e) => {
                tracing::error!("unexpected failure extracting the {quality} link: {e}");
                Err(ResolutionError::LinkNotFound {
                    quality: quality.clone(),
                })
            }
        }
    }

    async fn read_quality_link<S: BrowserSession>(
        &self,
        session: &mut S,
    ) -> Result<String, SessionError> {
        let selector = self.profile.quality_link_selector();
        let found = wait_for_elements(
            session,
            &selector,
            1,
            self.waits.extraction(),
            self.waits.poll_interval(),
        )
        .await?;
        let link = take_at(found, 0).ok_or_else(|| SessionError::NotFound(selector.clone()))?;
        let href = session.attribute(&link, "href").await?;
        match href.map(|h| h.trim().to_string()) {
            Some(h) if !h.is_empty() => Ok(h),
            _ => Err(SessionError::NotFound(format!("`{selector}` has no href"))),
        }
    }
}
