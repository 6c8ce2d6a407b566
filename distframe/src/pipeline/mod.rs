//! One run of the orchestration:
//! build trigger → endpoint resolver → (local static server → readiness poller →) embedding.
//!
//! Every step is a [`Stage`] transition. A successful build goes back to
//! [`Stage::NoBuild`] and starts a new render pass; the endpoint is resolved once and
//! at most one local server is started per run.

mod error;
mod stage;

pub use error::{RunError, RunFailure};
pub use stage::{Endpoint, Stage};

use distframe_build::{BuildDecision, BuildError, BuildTrigger, CommandRunner};
use distframe_core::config::{DistframeConfig, EmbedMode};
use distframe_embed::{embed, load_entry_markup, EmbedSource, HostPage, NoticeKind};
use distframe_serve::{
    EndpointResolver, Probe, ReadinessPoller, Resolution, ServeError, StaticServer,
};

/// Initial pass plus the one restart after a build.
const MAX_PASSES: u32 = 2;

const BUILD_DONE_NOTICE: &str = "Frontend ready!";

/// Outcome of a run that reached [`Stage::Embedded`].
pub struct RunReport {
    pub endpoint: Endpoint,
    pub passes: u32,
    pub stages: Vec<Stage>,
    /// Server backing [`Endpoint::Local`]. The caller decides when to shut it down.
    pub server: Option<StaticServer>,
}

pub struct Pipeline<'a> {
    config: &'a DistframeConfig,
    runner: &'a dyn CommandRunner,
    probe: &'a dyn Probe,
    server: Option<StaticServer>,
    passes: u32,
    built: bool,
    stages: Vec<Stage>,
    /// Notices replayed at the top of every later pass, since `begin_pass` resets the page.
    carried: Vec<(NoticeKind, String)>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a DistframeConfig,
        runner: &'a dyn CommandRunner,
        probe: &'a dyn Probe,
    ) -> Self {
        Self {
            config,
            runner,
            probe,
            server: None,
            passes: 0,
            built: false,
            stages: Vec::new(),
            carried: Vec::new(),
        }
    }

    /// Drive the state machine to `Embedded` or `Fatal`. Fatal errors are also shown on
    /// the page; a server started before the failure is stopped when dropped.
    pub fn run(mut self, page: &mut dyn HostPage) -> Result<RunReport, RunFailure> {
        let mut stage = Stage::NoBuild;
        loop {
            tracing::debug!(stage = %stage, pass = self.passes, "enter");
            self.stages.push(stage.clone());
            if let Stage::Embedded { endpoint } = &stage {
                self.finish_page(page, endpoint);
                return Ok(RunReport {
                    endpoint: endpoint.clone(),
                    passes: self.passes,
                    stages: self.stages,
                    server: self.server.take(),
                });
            }
            match self.step(stage, page) {
                Ok(next) => stage = next,
                Err(err) => {
                    self.stages.push(Stage::Fatal);
                    tracing::error!(pass = self.passes, "{}", err);
                    page.notice(NoticeKind::Error, &fatal_message(&err, self.config));
                    return Err(RunFailure {
                        error: err,
                        passes: self.passes,
                        stages: self.stages,
                    });
                }
            }
        }
    }

    fn step(&mut self, stage: Stage, page: &mut dyn HostPage) -> Result<Stage, RunError> {
        let cfg = self.config;
        match stage {
            Stage::NoBuild => {
                self.passes += 1;
                if self.passes > MAX_PASSES {
                    return Err(BuildError::OutputMissing {
                        dir: cfg.project.build_dir.clone(),
                    }
                    .into());
                }
                self.begin_pass(page);
                let trigger = BuildTrigger::new(&cfg.project, &cfg.build, self.runner);
                match trigger.decide() {
                    BuildDecision::Needed if self.built => Err(BuildError::OutputMissing {
                        dir: cfg.project.build_dir.clone(),
                    }
                    .into()),
                    BuildDecision::Needed => Ok(Stage::Building),
                    BuildDecision::OutputPresent | BuildDecision::NoManifest => {
                        Ok(Stage::BuildReady)
                    }
                }
            }

            Stage::Building => {
                page.notice(NoticeKind::Info, "Building frontend... (first run only)");
                BuildTrigger::new(&cfg.project, &cfg.build, self.runner).force_build()?;
                self.built = true;
                page.notice(NoticeKind::Success, BUILD_DONE_NOTICE);
                self.carried
                    .push((NoticeKind::Success, BUILD_DONE_NOTICE.to_string()));
                tracing::info!("Build finished, restarting render pass");
                Ok(Stage::NoBuild)
            }

            Stage::BuildReady => match cfg.embed.mode {
                EmbedMode::Iframe => Ok(Stage::ResolvingEndpoint),
                EmbedMode::RawHtml => {
                    if !cfg.project.build_dir.is_dir() {
                        return Err(ServeError::BuildDirectoryMissing {
                            dir: cfg.project.build_dir.clone(),
                        }
                        .into());
                    }
                    let entry = cfg.project.entry_path();
                    let source = load_entry_markup(&entry)?;
                    embed(page, &source, &cfg.embed);
                    Ok(Stage::Embedded {
                        endpoint: Endpoint::Inline(entry),
                    })
                }
            },

            Stage::ResolvingEndpoint => {
                let resolver = EndpointResolver::new(self.probe, cfg.serve.remote_timeout);
                match resolver.resolve(cfg.serve.remote_url.as_deref(), &cfg.project.build_dir)? {
                    Resolution::Remote { url } => Ok(Stage::RemoteReady { url }),
                    Resolution::Local { root } => Ok(Stage::StartingLocalServer { root }),
                }
            }

            Stage::RemoteReady { url } => {
                embed(page, &EmbedSource::Url(url.clone()), &cfg.embed);
                Ok(Stage::Embedded {
                    endpoint: Endpoint::Remote(url),
                })
            }

            Stage::StartingLocalServer { root } => {
                let url = match &self.server {
                    Some(server) => server.local_url(),
                    None => {
                        let server = StaticServer::start(
                            &root,
                            &cfg.serve.host,
                            cfg.serve.port,
                            &cfg.project.entry_file,
                        )?;
                        let url = server.local_url();
                        self.server = Some(server);
                        url
                    }
                };
                Ok(Stage::Polling { url })
            }

            Stage::Polling { url } => {
                ReadinessPoller::new(self.probe, cfg.poll).wait_ready(&url)?;
                Ok(Stage::LocalReady { url })
            }

            Stage::LocalReady { url } => {
                if let Some(server) = &self.server {
                    page.text(&format!(
                        "This page embeds the built app served locally on port {}.",
                        server.port()
                    ));
                }
                embed(page, &EmbedSource::Url(url.clone()), &cfg.embed);
                Ok(Stage::Embedded {
                    endpoint: Endpoint::Local(url),
                })
            }

            Stage::Embedded { .. } | Stage::Fatal => Ok(stage),
        }
    }

    fn begin_pass(&self, page: &mut dyn HostPage) {
        page.reset();
        page.set_page(&self.config.embed.page_title, self.config.embed.layout);
        page.heading(&self.config.embed.page_title);
        for (kind, text) in &self.carried {
            page.notice(*kind, text);
        }
    }

    fn finish_page(&self, page: &mut dyn HostPage, endpoint: &Endpoint) {
        let caption = match endpoint {
            Endpoint::Remote(url) => format!("Served from {}", url),
            Endpoint::Local(_) => match &self.server {
                Some(server) => format!(
                    "If the embedded app is blank, make sure the build ran and no other process is using port {}.",
                    server.port()
                ),
                None => String::new(),
            },
            Endpoint::Inline(path) => format!("Rendered from {}", path.display()),
        };
        if !caption.is_empty() {
            page.caption(&caption);
        }
        tracing::info!(kind = endpoint.kind(), location = %endpoint.location(), "Embedded");
    }
}

/// Plain-text message for the host page, naming the path, URL or port involved.
fn fatal_message(err: &RunError, config: &DistframeConfig) -> String {
    match err {
        RunError::Serve(ServeError::BuildDirectoryMissing { dir }) => format!(
            "Build directory not found: {}\nRun `{}` in the project root first.",
            dir.display(),
            config.build.build_cmd
        ),
        RunError::Serve(ServeError::PortConflict { .. }) => format!(
            "{}\nStop the other process or choose another port with --port.",
            err
        ),
        RunError::Serve(ServeError::EndpointUnreachable { url, .. }) => format!(
            "Failed to start static server at {}. Check for port conflicts.",
            url
        ),
        _ => err.to_string(),
    }
}
