//! CLI for animedl.

mod commands;

use animedl_core::config;
use animedl_core::site::DownloadPageMode;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use commands::{run_completions, run_config, run_man, run_resolve, ResolveArgs};

/// Top-level CLI for animedl.
#[derive(Debug, Parser)]
#[command(name = "animedl")]
#[command(about = "animedl: resolve direct download links for anime episodes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// How to reach the download page from the episode page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageMode {
    /// Read the downloads link and navigate to it.
    Href,
    /// Click the downloads link and follow the tab it opens.
    Tab,
}

impl From<PageMode> for DownloadPageMode {
    fn from(mode: PageMode) -> Self {
        match mode {
            PageMode::Href => DownloadPageMode::Href,
            PageMode::Tab => DownloadPageMode::Tab,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve the download link of one episode and print it.
    Resolve {
        /// Anime title to search for.
        title: String,

        /// Episode number (1 = first episode).
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        episode: u32,

        /// Run the browser without a window (overrides config).
        #[arg(long, conflicts_with = "headed")]
        headless: bool,

        /// Show the browser window (overrides config).
        #[arg(long)]
        headed: bool,

        /// Download-page navigation variant (overrides config).
        #[arg(long, value_enum, value_name = "MODE")]
        mode: Option<PageMode>,
    },

    /// Show the config file location and effective settings.
    Config,

    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print the man page to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Resolve {
                title,
                episode,
                headless,
                headed,
                mode,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let args = ResolveArgs {
                    title,
                    episode,
                    headless: headless_override(headless, headed),
                    mode: mode.map(DownloadPageMode::from),
                };
                run_resolve(cfg, &args).await?;
            }
            CliCommand::Config => run_config()?,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

fn headless_override(headless: bool, headed: bool) -> Option<bool> {
    match (headless, headed) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
