use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::site::SiteProfile;

/// Wait bounds for each kind of browser interaction, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitBounds {
    /// Page navigation timeout. Exceeding it is tolerated where the workflow allows.
    pub page_load_secs: f64,
    /// Search box, result list, episode entry and downloads anchor.
    pub interactive_secs: f64,
    /// Final quality link on the download page (slowest page to render).
    pub extraction_secs: f64,
    /// Delay between element lookups while waiting.
    pub poll_interval_ms: u64,
}

impl Default for WaitBounds {
    fn default() -> Self {
        Self {
            page_load_secs: 40.0,
            interactive_secs: 10.0,
            extraction_secs: 50.0,
            poll_interval_ms: 250,
        }
    }
}

impl WaitBounds {
    pub fn page_load(&self) -> Duration {
        secs(self.page_load_secs)
    }

    pub fn interactive(&self) -> Duration {
        secs(self.interactive_secs)
    }

    pub fn extraction(&self) -> Duration {
        secs(self.extraction_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Negative or non-finite values collapse to zero rather than panicking.
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

/// Browser launch options (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserOptions {
    /// Run without a visible window.
    pub headless: bool,
    /// Chrome/Chromium binary; autodetected when unset.
    pub executable: Option<PathBuf>,
    /// Skip image loading to speed up page loads.
    pub disable_images: bool,
    /// Extra command-line flags passed to the browser.
    pub args: Vec<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            disable_images: true,
            args: Vec::new(),
        }
    }
}

/// Global configuration loaded from `~/.config/animedl/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimedlConfig {
    pub site: SiteProfile,
    pub waits: WaitBounds,
    pub browser: BrowserOptions,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("animedl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Render a configuration the way it is stored on disk.
pub fn to_toml(cfg: &AnimedlConfig) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AnimedlConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<AnimedlConfig> {
    if !path.exists() {
        let default_cfg = AnimedlConfig::default();
        let toml = to_toml(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AnimedlConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
