//! `animedl resolve <title> <episode>` – print the episode's download link.
//!
//! An absent link is reported as an error so the process exits non-zero and
//! nothing downstream picks up an empty result.

use animedl_core::config::AnimedlConfig;
use animedl_core::query::{ResolvedLink, SearchQuery};
use animedl_core::resolver::EpisodeLinkResolver;
use animedl_core::session::ChromiumSession;
use animedl_core::site::DownloadPageMode;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct ResolveArgs {
    pub title: String,
    pub episode: u32,
    pub headless: Option<bool>,
    pub mode: Option<DownloadPageMode>,
}

pub async fn run_resolve(mut cfg: AnimedlConfig, args: &ResolveArgs) -> Result<()> {
    apply_overrides(&mut cfg, args);
    let query = SearchQuery::new(&args.title, args.episode)?;
    let resolver = EpisodeLinkResolver::from_config(&cfg);

    let session = ChromiumSession::launch(&cfg.browser, cfg.waits.page_load())
        .await
        .context("launch browser")?;
    let outcome = resolver.resolve_optional(session, &query).await?;

    let url = require_link(outcome, &query)?;
    println!("{url}");
    Ok(())
}

fn apply_overrides(cfg: &mut AnimedlConfig, args: &ResolveArgs) {
    if let Some(headless) = args.headless {
        cfg.browser.headless = headless;
    }
    if let Some(mode) = args.mode {
        cfg.site.download_page_mode = mode;
    }
}

fn require_link(outcome: Option<ResolvedLink>, query: &SearchQuery) -> Result<String> {
    match outcome {
        Some(link) => {
            tracing::info!(quality = %link.quality_label, "resolved {query}");
            Ok(link.url)
        }
        None => anyhow::bail!("no download link found for {query}; try again later"),
    }
}
