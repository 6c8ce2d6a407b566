use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use distframe_build::ProcessRunner;
use distframe_core::config::DistframeConfig;
use distframe_embed::HtmlPage;
use distframe_serve::HttpProbe;

use crate::pipeline::{Pipeline, RunFailure, RunReport};

#[derive(Debug, Default)]
pub struct RunOptions {
    pub page_out: Option<PathBuf>,
    pub once: bool,
    pub json: bool,
}

/// `--json` output.
#[derive(Debug, Serialize)]
struct RunSummary {
    ok: bool,
    mode: String,
    endpoint: Option<String>,
    location: Option<String>,
    passes: Option<u32>,
    stages: Vec<&'static str>,
    error: Option<String>,
}

impl RunSummary {
    fn new(config: &DistframeConfig, result: &Result<RunReport, RunFailure>) -> Self {
        match result {
            Ok(report) => Self {
                ok: true,
                mode: config.embed.mode.to_string(),
                endpoint: Some(report.endpoint.kind().to_string()),
                location: Some(report.endpoint.location()),
                passes: Some(report.passes),
                stages: report.stages.iter().map(|s| s.name()).collect(),
                error: None,
            },
            Err(failure) => Self {
                ok: false,
                mode: config.embed.mode.to_string(),
                endpoint: None,
                location: None,
                passes: Some(failure.passes),
                stages: failure.stages.iter().map(|s| s.name()).collect(),
                error: Some(failure.error.to_string()),
            },
        }
    }
}

pub fn cmd_run(config: &DistframeConfig, opts: &RunOptions) -> Result<()> {
    let probe = HttpProbe::new();
    let mut page = HtmlPage::new();
    let result = Pipeline::new(config, &ProcessRunner, &probe).run(&mut page);

    if opts.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&RunSummary::new(config, &result))?
        );
    } else if let Some(path) = &opts.page_out {
        page.write_to_file(path)?;
        tracing::info!(path = %path.display(), "Host page written");
    } else {
        print!("{}", page.render());
    }

    let mut report = result?;
    if let Some(server) = report.server.as_mut() {
        if !opts.once {
            tracing::info!(url = %server.local_url(), "Serving the embedded app. Press Ctrl+C to stop.");
            super::wait_for_ctrl_c()?;
        }
        server.shutdown();
    }
    Ok(())
}
