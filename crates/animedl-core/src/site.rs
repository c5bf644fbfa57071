//! Site contract: the selectors and structural positions the resolver relies on.
//!
//! Every selector here is tied to the current markup of the target site. A
//! layout change on the site breaks resolution; there is no fallback chain.

use serde::{Deserialize, Serialize};

/// How the search form is submitted once the title has been typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    /// Click the dedicated submit control (`SiteProfile::search_submit`).
    Button,
    /// Press Enter inside the search input.
    #[default]
    Enter,
}

/// How the resolver gets from the episode page to the download page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadPageMode {
    /// Read the anchor's `href` and navigate the current tab to it.
    #[default]
    Href,
    /// Click the anchor and continue in the tab it opens.
    Tab,
}

/// The single quality tier the resolver extracts, located by position.
///
/// The link is the `<a>` inside the `link_child`-th child of the
/// `option_group`-th child of the download-options container (both 1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityTier {
    /// Human-readable label reported with the resolved link.
    pub label: String,
    pub option_group: u32,
    pub link_child: u32,
}

impl Default for QualityTier {
    fn default() -> Self {
        Self {
            label: "1080p".to_string(),
            option_group: 1,
            link_child: 6,
        }
    }
}

/// Selector set for one target site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    /// Landing page loaded at the start of every resolution.
    pub base_url: String,
    pub search_input: String,
    /// Only used with `SubmitMode::Button`.
    pub search_submit: String,
    pub submit_mode: SubmitMode,
    /// Result entries in rank order; the first match is taken.
    pub result_links: String,
    /// Episode entries in DOM order (the site lists them newest first).
    pub episode_links: String,
    pub downloads_anchor: String,
    pub download_page_mode: DownloadPageMode,
    /// Container whose nested children hold one link per quality.
    pub download_options: String,
    pub quality: QualityTier,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            base_url: "https://ww19.gogoanimes.fi/".to_string(),
            search_input: "#keyword".to_string(),
            search_submit: "[onclick=\"do_search();\"]".to_string(),
            submit_mode: SubmitMode::default(),
            result_links: "ul > li > p.name > a".to_string(),
            episode_links: "#episode_related > li > a".to_string(),
            downloads_anchor: "div.favorites_book > ul > li.dowloads > a".to_string(),
            download_page_mode: DownloadPageMode::default(),
            download_options: "#content-download".to_string(),
            quality: QualityTier::default(),
        }
    }
}

impl SiteProfile {
    /// Selector for the link at a given structural position in the download options.
    pub fn option_link_selector(&self, option_group: u32, link_child: u32) -> String {
        format!(
            "{} > div:nth-child({}) > div:nth-child({}) > a",
            self.download_options, option_group, link_child
        )
    }

    /// Selector for the configured quality tier's link.
    pub fn quality_link_selector(&self) -> String {
        self.option_link_selector(self.quality.option_group, self.quality.link_child)
    }
}
