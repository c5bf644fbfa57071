//! Forward-only navigation stages of one resolution attempt.

use std::fmt;

/// Stage the browser session has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NavigationState {
    Home,
    SearchSubmitted,
    ResultSelected,
    EpisodeSelected,
    DownloadPageLoaded,
    LinkExtracted,
}

impl NavigationState {
    /// The stage that follows this one, or `None` after `LinkExtracted`.
    pub fn next(self) -> Option<NavigationState> {
        use NavigationState::*;
        match self {
            Home => Some(SearchSubmitted),
            SearchSubmitted => Some(ResultSelected),
            ResultSelected => Some(EpisodeSelected),
            EpisodeSelected => Some(DownloadPageLoaded),
            DownloadPageLoaded => Some(LinkExtracted),
            LinkExtracted => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NavigationState::Home => "home",
            NavigationState::SearchSubmitted => "search-submitted",
            NavigationState::ResultSelected => "result-selected",
            NavigationState::EpisodeSelected => "episode-selected",
            NavigationState::DownloadPageLoaded => "download-page-loaded",
            NavigationState::LinkExtracted => "link-extracted",
        }
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected transition: only the immediate successor may be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: NavigationState,
    pub to: NavigationState,
}

/// Tracks progress through the stages. Starts at `Home`; never moves back.
#[derive(Debug)]
pub struct Navigation {
    current: NavigationState,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigation {
    pub fn new() -> Self {
        Self {
            current: NavigationState::Home,
        }
    }

    pub fn current(&self) -> NavigationState {
        self.current
    }

    /// Stage the next transition would enter; errors are attributed to it.
    pub fn pending(&self) -> NavigationState {
        self.current.next().unwrap_or(self.current)
    }

    /// Moves to `to`, which must be the immediate successor of the current stage.
    pub fn advance(&mut self, to: NavigationState) -> Result<(), InvalidTransition> {
        if self.current.next() != Some(to) {
            return Err(InvalidTransition {
                from: self.current,
                to,
            });
        }
        tracing::debug!(from = %self.current, to = %to, "navigation advanced");
        self.current = to;
        Ok(())
    }

    /// Moves to the successor of the current stage, if there is one.
    pub fn advance_next(&mut self) -> Option<NavigationState> {
        let next = self.current.next()?;
        self.advance(next).ok()?;
        Some(next)
    }
}
