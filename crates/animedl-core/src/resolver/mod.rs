//! Episode download-link resolution.
//!
//! One call to [`EpisodeLinkResolver::resolve`] drives a browser session from
//! the site's landing page to the download page of a single episode and reads
//! the link of the configured quality tier:
//!
//! home → search → first result → episode (reverse index) → download page → link
//!
//! The session is consumed and closed exactly once whatever the outcome. There
//! is no retry; a recoverable [`ResolutionError::LinkNotFound`] tells the
//! caller a fresh attempt later may succeed.

mod episode;
mod error;
mod link;
mod stages;

pub use episode::reverse_index;
pub use error::ResolutionError;
pub use link::absolutize;

use tracing::Instrument;

use crate::config::{AnimedlConfig, WaitBounds};
use crate::navigation::Navigation;
use crate::query::{ResolvedLink, SearchQuery};
use crate::session::BrowserSession;
use crate::site::SiteProfile;

/// Resolves `(title, episode)` to a direct download URL on one site.
#[derive(Debug, Clone)]
pub struct EpisodeLinkResolver {
    profile: SiteProfile,
    waits: WaitBounds,
}

impl EpisodeLinkResolver {
    pub fn new(profile: SiteProfile, waits: WaitBounds) -> Self {
        Self { profile, waits }
    }

    pub fn from_config(cfg: &AnimedlConfig) -> Self {
        Self::new(cfg.site.clone(), cfg.waits.clone())
    }

    /// Runs the full navigation on `session`, then closes it.
    pub async fn resolve<S: BrowserSession>(
        &self,
        mut session: S,
        query: &SearchQuery,
    ) -> Result<ResolvedLink, ResolutionError> {
        let span = tracing::info_span!(
            "resolve",
            title = query.title(),
            episode = query.episode()
        );
        let outcome = self.navigate(&mut session, query).instrument(span).await;

        match session.close().await {
            Ok(()) => tracing::info!("browser closed"),
            Err(e) => tracing::warn!("closing browser failed: {e}"),
        }
        outcome
    }

    /// Like [`resolve`](Self::resolve), with a missing final link reported as `Ok(None)`.
    pub async fn resolve_optional<S: BrowserSession>(
        &self,
        session: S,
        query: &SearchQuery,
    ) -> Result<Option<ResolvedLink>, ResolutionError> {
        match self.resolve(session, query).await {
            Ok(link) => Ok(Some(link)),
            Err(e) if e.is_recoverable() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn navigate<S: BrowserSession>(
        &self,
        session: &mut S,
        query: &SearchQuery,
    ) -> Result<ResolvedLink, ResolutionError> {
        let mut nav = Navigation::new();

        self.load_home(session).await?;

        self.submit_search(session, query.title(), nav.pending()).await?;
        nav.advance_next();

        self.select_first_result(session, nav.pending()).await?;
        nav.advance_next();

        self.select_episode(session, query.episode(), nav.pending()).await?;
        nav.advance_next();

        self.open_download_page(session, nav.pending()).await?;
        nav.advance_next();

        let link = self.extract_link(session).await?;
        nav.advance_next();

        tracing::info!(stage = %nav.current(), url = %link.url, "download link resolved");
        Ok(link)
    }
}
