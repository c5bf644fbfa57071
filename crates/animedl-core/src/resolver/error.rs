//! Resolution failures, split into abort-worthy and recoverable.

use std::time::Duration;
use thiserror::Error;

use crate::navigation::NavigationState;
use crate::query::QueryError;
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The landing page could not be reached at all.
    #[error("site unreachable: {url}: {reason}")]
    SiteUnreachable { url: String, reason: String },

    /// A required element never appeared within its wait bound.
    #[error("{stage}: `{selector}` not found within {waited:?}")]
    ElementNotFound {
        stage: NavigationState,
        selector: String,
        waited: Duration,
    },

    /// The final quality link is missing or could not be read. A later,
    /// fresh attempt may succeed.
    #[error("no {quality} download link on the download page")]
    LinkNotFound { quality: String },

    /// The browser driver failed while interacting with a page.
    #[error("{stage}: {source}")]
    Browser {
        stage: NavigationState,
        #[source]
        source: SessionError,
    },

    #[error(transparent)]
    InvalidQuery(#[from] QueryError),
}

impl ResolutionError {
    /// Only a missing final link is worth another attempt later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ResolutionError::LinkNotFound { .. })
    }
}
