//! Scripted in-memory anime site implementing `BrowserSession`.
//!
//! Pages follow the real site's flow: landing page with a search box, result
//! list, episode list rendered newest first, episode page with a downloads
//! anchor, and a download page whose options container holds a grid of links.
//! Every session opened from a `MockSite` reports into a shared `Probe`.
//!
//! With `navigation_lag` set, a click or Enter that leaves the page only takes
//! effect after the next element lookup (or an explicit navigation wait), the
//! way a real browser keeps serving the old document for a moment.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use animedl_core::config::WaitBounds;
use animedl_core::session::{BrowserSession, SessionError};
use animedl_core::site::SiteProfile;

pub const BASE_URL: &str = "https://anime.test/";
pub const DOWNLOAD_HREF: &str = "/download?id=42";
pub const DOWNLOAD_URL: &str = "https://anime.test/download?id=42";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeBehavior {
    Loads,
    TimesOut,
    Unreachable,
}

/// What happened during a session, shared with the test.
#[derive(Debug, Default)]
pub struct Record {
    pub acquired: usize,
    pub closes: usize,
    pub typed: Vec<String>,
    pub enters: usize,
    pub submit_clicks: usize,
    pub result_clicks: Vec<usize>,
    pub episode_clicks: Vec<usize>,
    pub visited: Vec<String>,
    pub tab_switches: usize,
    pub navigation_waits: usize,
    /// Release entries clicked on the landing page instead of a search result.
    pub release_clicks: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Probe(Arc<Mutex<Record>>);

impl Probe {
    pub fn get(&self) -> MutexGuard<'_, Record> {
        self.0.lock().unwrap()
    }
}

#[derive(Debug, Clone)]
pub struct MockSite {
    pub profile: SiteProfile,
    pub home: HomeBehavior,
    pub search_box: bool,
    /// Titles listed for any search; empty renders no result list.
    pub results: Vec<String>,
    pub episodes: usize,
    /// Lookups of the episode list that come back empty before it renders.
    pub episode_render_delay: usize,
    pub anchor_href: Option<String>,
    pub download_page_times_out: bool,
    /// `options[g][c]` is the href inside child `c + 1` of group `g + 1`.
    pub options: Vec<Vec<Option<String>>>,
    /// Reading the quality link's href fails with a driver error.
    pub extraction_fault: bool,
    /// Page changes triggered by clicks or Enter commit one lookup late.
    pub navigation_lag: bool,
    /// Waiting for a navigation times out (after the page has changed).
    pub navigation_wait_times_out: bool,
    /// Recent releases on the landing page, shaped like search results.
    pub home_releases: usize,
}

/// href placed at 1-based position (group, child) of the download options.
pub fn option_href(group: usize, child: usize) -> String {
    format!("https://cdn.test/g{group}-c{child}.mp4")
}

impl MockSite {
    /// A well-behaved site listing `episodes` episodes for "Naruto".
    pub fn new(episodes: usize) -> Self {
        let options: Vec<Vec<Option<String>>> = (1..=2)
            .map(|g| (1..=8).map(|c| Some(option_href(g, c))).collect())
            .collect();
        Self {
            profile: SiteProfile {
                base_url: BASE_URL.to_string(),
                ..SiteProfile::default()
            },
            home: HomeBehavior::Loads,
            search_box: true,
            results: vec!["Naruto".to_string(), "Naruto Shippuden".to_string()],
            episodes,
            episode_render_delay: 0,
            anchor_href: Some(DOWNLOAD_HREF.to_string()),
            download_page_times_out: false,
            options,
            extraction_fault: false,
            navigation_lag: false,
            navigation_wait_times_out: false,
            home_releases: 0,
        }
    }

    /// Opens a session; counts as one acquisition.
    pub fn open(&self, probe: &Probe) -> MockSession {
        probe.get().acquired += 1;
        MockSession {
            site: self.clone(),
            probe: probe.clone(),
            page: Page::Blank,
            in_flight: None,
            pending_tab: None,
            episode_delay_left: self.episode_render_delay,
        }
    }
}

/// Short bounds so failing waits stay cheap even without paused time.
pub fn test_waits() -> WaitBounds {
    WaitBounds {
        page_load_secs: 2.0,
        interactive_secs: 1.0,
        extraction_secs: 5.0,
        poll_interval_ms: 50,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Blank,
    Home,
    Results,
    Anime,
    Episode(usize),
    Download,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    selector: String,
    index: usize,
    /// Page the element was found on; clicks act on that document.
    page: Page,
}

pub struct MockSession {
    site: MockSite,
    probe: Probe,
    page: Page,
    in_flight: Option<Page>,
    pending_tab: Option<Page>,
    episode_delay_left: usize,
}

impl MockSession {
    fn navigate_to(&mut self, page: Page) {
        if self.site.navigation_lag {
            self.in_flight = Some(page);
        } else {
            self.page = page;
        }
    }

    fn commit_navigation(&mut self) {
        if let Some(page) = self.in_flight.take() {
            self.page = page;
        }
    }

    fn count(&mut self, selector: &str) -> usize {
        let p = &self.site.profile;
        match self.page {
            Page::Home if selector == p.search_input && self.site.search_box => 1,
            Page::Home if selector == p.search_submit && self.site.search_box => 1,
            Page::Home if selector == p.result_links => self.site.home_releases,
            Page::Results if selector == p.result_links => self.site.results.len(),
            Page::Anime if selector == p.episode_links => {
                if self.episode_delay_left > 0 {
                    self.episode_delay_left -= 1;
                    0
                } else {
                    self.site.episodes
                }
            }
            Page::Episode(_) if selector == p.downloads_anchor => 1,
            Page::Download => {
                let hit = self.site.options.iter().enumerate().any(|(g, children)| {
                    children.iter().enumerate().any(|(c, href)| {
                        href.is_some() && selector == p.option_link_selector(g as u32 + 1, c as u32 + 1)
                    })
                });
                usize::from(hit)
            }
            _ => 0,
        }
    }

    fn option_at(&self, selector: &str) -> Option<Option<String>> {
        let p = &self.site.profile;
        self.site.options.iter().enumerate().find_map(|(g, children)| {
            children.iter().enumerate().find_map(|(c, href)| {
                (selector == p.option_link_selector(g as u32 + 1, c as u32 + 1)).then(|| href.clone())
            })
        })
    }
}

impl BrowserSession for MockSession {
    type Element = MockElement;

    async fn goto(&mut self, url: &str, _bound: Duration) -> Result<(), SessionError> {
        self.probe.get().visited.push(url.to_string());
        if url == self.site.profile.base_url {
            return match self.site.home {
                HomeBehavior::Loads => {
                    self.page = Page::Home;
                    Ok(())
                }
                HomeBehavior::TimesOut => {
                    self.page = Page::Home;
                    Err(SessionError::Timeout(format!("load {url}")))
                }
                HomeBehavior::Unreachable => Err(SessionError::Unreachable(
                    "net::ERR_NAME_NOT_RESOLVED".to_string(),
                )),
            };
        }
        if url == DOWNLOAD_URL && matches!(self.page, Page::Episode(_)) {
            self.page = Page::Download;
            if self.site.download_page_times_out {
                return Err(SessionError::Timeout(format!("load {url}")));
            }
            return Ok(());
        }
        Err(SessionError::Driver(format!("unexpected navigation to {url}")))
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<MockElement>, SessionError> {
        let page = self.page;
        let n = self.count(selector);
        self.commit_navigation();
        Ok((0..n)
            .map(|index| MockElement {
                selector: selector.to_string(),
                index,
                page,
            })
            .collect())
    }

    async fn type_text(&mut self, element: &MockElement, text: &str) -> Result<(), SessionError> {
        if element.selector != self.site.profile.search_input {
            return Err(SessionError::Driver("typing into a non-input".into()));
        }
        self.probe.get().typed.push(text.to_string());
        Ok(())
    }

    async fn press_enter(&mut self, element: &MockElement) -> Result<(), SessionError> {
        self.probe.get().enters += 1;
        if self.page == Page::Home && element.selector == self.site.profile.search_input {
            self.navigate_to(Page::Results);
        }
        Ok(())
    }

    async fn click(&mut self, element: &MockElement) -> Result<(), SessionError> {
        let p = &self.site.profile;
        match element.page {
            Page::Home if element.selector == p.search_submit => {
                self.probe.get().submit_clicks += 1;
                self.navigate_to(Page::Results);
            }
            Page::Home if element.selector == p.search_input => {}
            Page::Home if element.selector == p.result_links => {
                self.probe.get().release_clicks += 1;
                self.navigate_to(Page::Anime);
            }
            Page::Results if element.selector == p.result_links => {
                self.probe.get().result_clicks.push(element.index);
                self.navigate_to(Page::Anime);
            }
            Page::Anime if element.selector == p.episode_links => {
                self.probe.get().episode_clicks.push(element.index);
                self.navigate_to(Page::Episode(element.index));
            }
            Page::Episode(_) if element.selector == p.downloads_anchor => {
                self.pending_tab = Some(Page::Download);
            }
            _ => return Err(SessionError::Driver(format!("stale element {}", element.selector))),
        }
        Ok(())
    }

    async fn wait_for_navigation(&mut self, bound: Duration) -> Result<(), SessionError> {
        self.probe.get().navigation_waits += 1;
        self.commit_navigation();
        if self.site.navigation_wait_times_out {
            return Err(SessionError::Timeout(format!("navigation after {bound:?}")));
        }
        Ok(())
    }

    async fn attribute(
        &mut self,
        element: &MockElement,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        if name != "href" {
            return Ok(None);
        }
        if element.selector == self.site.profile.downloads_anchor {
            return Ok(self.site.anchor_href.clone());
        }
        if self.page == Page::Download {
            if self.site.extraction_fault {
                return Err(SessionError::Driver("node detached from document".into()));
            }
            return Ok(self.option_at(&element.selector).flatten());
        }
        Ok(None)
    }

    async fn current_url(&mut self) -> Result<Option<String>, SessionError> {
        let base = &self.site.profile.base_url;
        Ok(match self.page {
            Page::Blank => None,
            Page::Home => Some(base.clone()),
            Page::Results => Some(format!("{base}search")),
            Page::Anime => Some(format!("{base}category/naruto")),
            Page::Episode(i) => Some(format!("{base}watch/{i}")),
            Page::Download => Some(DOWNLOAD_URL.to_string()),
        })
    }

    async fn switch_to_new_tab(&mut self, bound: Duration) -> Result<(), SessionError> {
        match self.pending_tab.take() {
            Some(page) => {
                self.probe.get().tab_switches += 1;
                self.page = page;
                Ok(())
            }
            None => Err(SessionError::Timeout(format!("no new tab within {bound:?}"))),
        }
    }

    async fn close(self) -> Result<(), SessionError> {
        self.probe.get().closes += 1;
        Ok(())
    }
}
