//! Browser session seam.
//!
//! The resolver drives any [`BrowserSession`]; [`ChromiumSession`] is the real
//! driver, tests use a scripted in-memory site.

mod chromium;
mod error;
mod wait;

pub use chromium::ChromiumSession;
pub use error::SessionError;
pub use wait::wait_for_elements;

use std::time::Duration;

/// One browser context with a current page, owned by a single resolution.
///
/// Element handles are only valid for the page they were found on.
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    type Element;

    /// Navigates the current page. `bound` caps how long to wait for the load.
    async fn goto(&mut self, url: &str, bound: Duration) -> Result<(), SessionError>;

    /// All elements currently matching `selector`, in document order. Empty if none.
    async fn find_all(&mut self, selector: &str) -> Result<Vec<Self::Element>, SessionError>;

    async fn type_text(&mut self, element: &Self::Element, text: &str)
        -> Result<(), SessionError>;

    async fn press_enter(&mut self, element: &Self::Element) -> Result<(), SessionError>;

    async fn click(&mut self, element: &Self::Element) -> Result<(), SessionError>;

    /// Waits for the navigation started by the last click or key press to finish.
    ///
    /// Returns at once when nothing is navigating.
    async fn wait_for_navigation(&mut self, bound: Duration) -> Result<(), SessionError>;

    async fn attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, SessionError>;

    /// URL of the current page, when the driver knows it.
    async fn current_url(&mut self) -> Result<Option<String>, SessionError>;

    /// Makes the most recently opened tab the current page.
    async fn switch_to_new_tab(&mut self, bound: Duration) -> Result<(), SessionError>;

    /// Releases the browser. Consumes the session so it cannot be reused.
    async fn close(self) -> Result<(), SessionError>
    where
        Self: Sized;
}
