//! Turning a downloads-anchor `href` into an absolute URL.

use url::Url;

/// Joins `href` against `base`. Absolute hrefs are returned unchanged.
pub fn absolutize(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Ok(abs) = Url::parse(href) {
        return Some(abs.to_string());
    }
    Url::parse(base).ok()?.join(href).ok().map(|u| u.to_string())
}
