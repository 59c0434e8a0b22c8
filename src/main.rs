//! SkipCut
//!
//! A command-line front-end for a video downloader and a transcoder: fetch an
//! online video, strip crowd-sourced sponsor segments and trim it to a
//! requested section, either on keyframes (stream copy) or precisely
//! (re-encode).
//!
//! # Usage
//!
//! ```bash
//! skipcut download "https://youtu.be/dQw4w9WgXcQ" --start 1:00 --end 2:30
//! skipcut segments "https://youtu.be/dQw4w9WgXcQ" --margin 1
//! skipcut plan --segments-file segments.json --start 60 --end 150 --keyframes-file kf.txt
//! skipcut remap --url dQw4w9WgXcQ --duration 10:00 --start 60 --end 150
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use skipcut::adapters::init_tracing;
use skipcut::app::DefaultAppContainer;
use skipcut::cli::{commands, Cli, Commands};
use skipcut::config_initialization::initialize_configuration;
use skipcut::ports::CancelToken;

/// Main entry point for the SkipCut CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(&cli.log_level, cli.json_logs)?;
    info!("Starting SkipCut v{}", env!("CARGO_PKG_VERSION"));

    let config = initialize_configuration(&cli)?;
    let container =
        DefaultAppContainer::new(config).context("Failed to initialize application")?;

    // Ctrl-C stops the running tool and triggers cleanup
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling");
                cancel.cancel();
            }
        });
    }

    // Execute the requested command
    match cli.command {
        Commands::Download(args) => {
            info!("Executing download command");
            commands::download(args, &container, &cancel).await?;
        }
        Commands::Segments(args) => {
            info!("Executing segments command");
            commands::segments(args, &container).await?;
        }
        Commands::Plan(args) => {
            info!("Executing plan command");
            commands::plan(args, &container).await?;
        }
        Commands::Remap(args) => {
            info!("Executing remap command");
            commands::remap(args, &container).await?;
        }
    }

    info!("SkipCut completed successfully");
    Ok(())
}
