//! yotoup - batch-upload audio folders into Yoto playlists and randomize
//! track icons, driving the web editor through WebDriver.
//!
//! Two modes, mirroring the two phases of putting a card together:
//! `upload` creates a new playlist from a folder of audio files, `icons`
//! decorates an existing playlist. The destructive Create/Save clicks are
//! always left to the operator.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod browser;
mod config;
mod error;
mod files;
mod icons;
mod upload;
mod workflow;

#[derive(Parser, Debug)]
#[command(name = "yotoup")]
#[command(about = "Batch-upload audio to Yoto 'My Cards' playlists")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload all audio files in a folder into a new Yoto playlist.
    Upload {
        /// Playlist name (prompted for when omitted).
        #[arg(short, long)]
        playlist: Option<String>,

        /// Folder containing the audio files (prompted for when omitted).
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Files per upload batch.
        #[arg(long)]
        chunk_size: Option<NonZeroUsize>,

        /// Run the browser with a visible window.
        #[arg(long)]
        visible: bool,
    },
    /// Assign random icons to the tracks of an existing playlist.
    Icons {
        /// Playlist edit URL (https://my.yotoplay.com/card/XXXX/edit).
        url: String,

        /// Run the browser with a visible window.
        #[arg(long)]
        visible: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "yotoup=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut settings = config::Settings::load().context("failed to load configuration")?;
    settings
        .validate()
        .map_err(|msg| anyhow::anyhow!("invalid configuration: {msg}"))?;

    match cli.command {
        Command::Upload {
            playlist,
            folder,
            chunk_size,
            visible,
        } => {
            if visible {
                settings.browser.headless = false;
            }
            let args = workflow::UploadArgs {
                playlist,
                folder,
                chunk_size: chunk_size.map(NonZeroUsize::get),
            };
            workflow::run_upload(&settings, args)
                .await
                .context("upload mode failed")?;
        }
        Command::Icons { url, visible } => {
            if visible {
                settings.browser.headless = false;
            }
            workflow::run_icons(&settings, &url)
                .await
                .context("icon mode failed")?;
        }
    }

    Ok(())
}
