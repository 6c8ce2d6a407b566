use anyhow::{Context, Result};

use distframe_core::config::DistframeConfig;
use distframe_serve::StaticServer;

pub fn cmd_serve(config: &DistframeConfig) -> Result<()> {
    let mut server = StaticServer::start(
        &config.project.build_dir,
        &config.serve.host,
        config.serve.port,
        &config.project.entry_file,
    )
    .context("Failed to start static server")?;

    println!("Serving {} at {}", server.root().display(), server.local_url());
    println!("Press Ctrl+C to stop.");
    super::wait_for_ctrl_c()?;
    server.shutdown();
    Ok(())
}
