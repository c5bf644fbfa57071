//! Resolver input and output values.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("episode number must be at least 1")]
    ZeroEpisode,
}

/// What to look for: a title and a 1-based episode number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    title: String,
    episode: u32,
}

impl SearchQuery {
    /// Validates and builds a query. Surrounding whitespace is trimmed from the title.
    pub fn new(title: &str, episode: u32) -> Result<Self, QueryError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(QueryError::EmptyTitle);
        }
        if episode == 0 {
            return Err(QueryError::ZeroEpisode);
        }
        Ok(Self {
            title: title.to_string(),
            episode,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} EP{}", self.title, self.episode)
    }
}

/// A direct download URL for one quality tier of one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub url: String,
    pub quality_label: String,
}
