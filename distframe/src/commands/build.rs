use anyhow::Result;

use distframe_build::{BuildOutcome, BuildTrigger, ProcessRunner};
use distframe_core::config::DistframeConfig;

pub fn cmd_build(config: &DistframeConfig, force: bool) -> Result<()> {
    let trigger = BuildTrigger::new(&config.project, &config.build, &ProcessRunner);
    let dir = config.project.build_dir.display();
    if force {
        trigger.force_build()?;
        println!("Built {}", dir);
        return Ok(());
    }
    match trigger.run()? {
        BuildOutcome::AlreadyBuilt => println!("{} already exists, nothing to do (use --force to rebuild)", dir),
        BuildOutcome::NoManifest => anyhow::bail!(
            "No build output at {} and no {} to build from",
            dir,
            config.project.manifest.display()
        ),
        BuildOutcome::Built => println!("Built {}", dir),
    }
    Ok(())
}
