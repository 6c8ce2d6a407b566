use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use distframe_core::config::env_keys::project as project_keys;
use distframe_core::config::{DistframeConfig, EmbedMode};

/// distframe - build, serve and embed a single-page app's dist/ folder in a host page
#[derive(Parser, Debug)]
#[command(name = "distframe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root: the build manifest lives here and build commands run here
    #[arg(long, global = true, value_name = "DIR", env = project_keys::DISTFRAME_PROJECT_DIR)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full render pass: build if needed, resolve the endpoint, serve/poll, embed
    Run {
        #[command(flatten)]
        serve: ServeArgs,

        /// Remote published URL, preferred when it answers HTTP 200
        #[arg(long, value_name = "URL")]
        remote_url: Option<String>,

        /// Embedding strategy: iframe or raw-html
        #[arg(long, value_name = "MODE", value_parser = parse_embed_mode)]
        mode: Option<EmbedMode>,

        /// Embedded viewport height in pixels
        #[arg(long, value_name = "PX")]
        frame_height: Option<u32>,

        /// Disable scrolling in the embedded viewport
        #[arg(long, default_value = "false")]
        no_scrolling: bool,

        /// Host page title
        #[arg(long)]
        title: Option<String>,

        /// Write the host page here instead of stdout
        #[arg(long, value_name = "FILE")]
        page_out: Option<PathBuf>,

        /// Stop the local server right after rendering instead of waiting for Ctrl+C
        #[arg(long, default_value = "false")]
        once: bool,

        /// Print a JSON summary of the run instead of the page
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Run the build trigger only
    Build {
        /// Run install + build even if the output directory exists
        #[arg(long, default_value = "false")]
        force: bool,
    },

    /// Serve the build directory in the foreground until Ctrl+C
    Serve {
        #[command(flatten)]
        serve: ServeArgs,
    },

    /// Poll a URL until it answers HTTP 200 or the attempt budget is spent
    Probe {
        #[arg(value_name = "URL")]
        url: String,

        /// Attempt budget (default: from env or 30)
        #[arg(long)]
        attempts: Option<u32>,

        /// Per-attempt timeout in milliseconds (default: from env or 1000)
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,

        /// Sleep between attempts in milliseconds (default: from env or 200)
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Build output directory, relative to the project dir (default: from env or dist)
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Interface to bind (default: from env or 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind, 0 for ephemeral (default: from env or 3002)
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    pub fn apply(&self, config: &mut DistframeConfig) {
        if let Some(dir) = &self.build_dir {
            config.project.build_dir = config.project.project_dir.join(dir);
        }
        if let Some(host) = &self.host {
            config.serve.host = host.clone();
        }
        if let Some(port) = self.port {
            config.serve.port = port;
        }
    }
}

fn parse_embed_mode(s: &str) -> Result<EmbedMode, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "distframe",
            "run",
            "--port",
            "4000",
            "--mode",
            "raw-html",
            "--once",
            "--project-dir",
            "/srv/app",
        ])
        .unwrap();
        assert_eq!(cli.project_dir, Some(PathBuf::from("/srv/app")));
        match cli.command {
            Commands::Run {
                serve, mode, once, ..
            } => {
                assert_eq!(serve.port, Some(4000));
                assert_eq!(mode, Some(EmbedMode::RawHtml));
                assert!(once);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_project_dir_env_key() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "project_dir")
            .unwrap();
        assert_eq!(
            arg.get_env(),
            Some(std::ffi::OsStr::new(project_keys::DISTFRAME_PROJECT_DIR))
        );
    }

    #[test]
    fn test_bad_mode_rejected() {
        assert!(Cli::try_parse_from(["distframe", "run", "--mode", "popup"]).is_err());
    }

    #[test]
    fn test_serve_args_apply() {
        let mut cfg = DistframeConfig::with_project_dir("/srv/app");
        ServeArgs {
            build_dir: Some(PathBuf::from("build")),
            host: Some("127.0.0.1".to_string()),
            port: Some(0),
        }
        .apply(&mut cfg);
        assert_eq!(cfg.project.build_dir, PathBuf::from("/srv/app/build"));
        assert_eq!(cfg.serve.host, "127.0.0.1");
        assert_eq!(cfg.serve.port, 0);
    }
}
