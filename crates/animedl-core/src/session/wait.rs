//! Bounded polling for elements that render asynchronously.

use std::time::Duration;
use tokio::time::Instant;

use super::{BrowserSession, SessionError};

/// Polls `selector` until at least `min_count` elements match or `bound` elapses.
///
/// Returns every match found on the successful poll. Timeouts and vanished
/// nodes count as "no match yet"; any other lookup error is returned
/// immediately. Running out of time is reported as `SessionError::Timeout`
/// naming the selector.
pub async fn wait_for_elements<S: BrowserSession>(
    session: &mut S,
    selector: &str,
    min_count: usize,
    bound: Duration,
    poll: Duration,
) -> Result<Vec<S::Element>, SessionError> {
    let deadline = Instant::now() + bound;
    let mut found = 0;
    loop {
        match session.find_all(selector).await {
            Ok(elements) if elements.len() >= min_count.max(1) => return Ok(elements),
            Ok(elements) => found = elements.len(),
            Err(e) if e.is_retryable_lookup() => {}
            Err(e) => return Err(e),
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(SessionError::Timeout(format!(
                "`{selector}`: {found} of {min_count} element(s) after {bound:?}"
            )));
        }
        tokio::time::sleep(poll.min(deadline - now)).await;
    }
}
