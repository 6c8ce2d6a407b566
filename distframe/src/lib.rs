//! distframe CLI library: argument parsing, dispatch, and the render-pass pipeline.

mod cli;
mod commands;
pub mod pipeline;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use distframe_core::config::DistframeConfig;

/// Run the CLI: parse args, load layered config, dispatch to a command handler.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    distframe_core::observability::init_tracing();

    let mut config = DistframeConfig::load(cli.project_dir.clone())?;
    tracing::debug!(project_dir = %config.project.project_dir.display(), "Configuration loaded");

    match cli.command {
        Commands::Run {
            serve,
            remote_url,
            mode,
            frame_height,
            no_scrolling,
            title,
            page_out,
            once,
            json,
        } => {
            serve.apply(&mut config);
            if remote_url.is_some() {
                config.serve.remote_url = remote_url;
            }
            if let Some(mode) = mode {
                config.embed.mode = mode;
            }
            if let Some(height) = frame_height {
                config.embed.frame_height = height;
            }
            if no_scrolling {
                config.embed.scrolling = false;
            }
            if let Some(title) = title {
                config.embed.page_title = title;
            }
            let opts = commands::run::RunOptions {
                page_out,
                once,
                json,
            };
            commands::run::cmd_run(&config, &opts)?;
        }
        Commands::Build { force } => {
            commands::build::cmd_build(&config, force)?;
        }
        Commands::Serve { serve } => {
            serve.apply(&mut config);
            commands::serve::cmd_serve(&config)?;
        }
        Commands::Probe {
            url,
            attempts,
            timeout_ms,
            interval_ms,
        } => {
            commands::probe::cmd_probe(&url, config.poll, attempts, timeout_ms, interval_ms)?;
        }
    }
    Ok(())
}
