//! Driver-level failures reported by a browser session.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// A navigation or lookup did not finish within its bound.
    #[error("timed out: {0}")]
    Timeout(String),
    /// The page could not be reached at all (DNS, refused connection, ...).
    #[error("unreachable: {0}")]
    Unreachable(String),
    /// A handle or tab the caller expected does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Launch failures and any other driver fault.
    #[error("browser driver: {0}")]
    Driver(String),
}

impl SessionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout(_))
    }

    /// A lookup that may succeed if repeated once the page settles.
    pub fn is_retryable_lookup(&self) -> bool {
        matches!(self, SessionError::Timeout(_) | SessionError::NotFound(_))
    }
}

/// Chromium reports navigation failures as `net::ERR_*` codes.
pub(crate) fn is_network_failure(message: &str) -> bool {
    const UNREACHABLE: [&str; 6] = [
        "net::ERR_NAME_NOT_RESOLVED",
        "net::ERR_CONNECTION_REFUSED",
        "net::ERR_CONNECTION_RESET",
        "net::ERR_ADDRESS_UNREACHABLE",
        "net::ERR_INTERNET_DISCONNECTED",
        "net::ERR_CONNECTION_CLOSED",
    ];
    UNREACHABLE.iter().any(|code| message.contains(code))
}

/// Protocol errors raised while the page is swapping documents.
pub(crate) fn is_transient_lookup(message: &str) -> bool {
    const IN_FLIGHT: [&str; 5] = [
        "Cannot find context with specified id",
        "Could not find node with given id",
        "No node with given id found",
        "Execution context was destroyed",
        "Node is detached from document",
    ];
    IN_FLIGHT.iter().any(|m| message.contains(m))
}
