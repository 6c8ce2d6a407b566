use std::path::PathBuf;
use thiserror::Error;

use crate::command::BuildStep;

/// Errors returned by the build trigger. All of them end the current render pass.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{step} command is empty")]
    EmptyCommand { step: BuildStep },

    #[error("command not found: {program} (is it installed and on PATH?)")]
    CommandNotFound { program: String },

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with {}", exit_label(.code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("build finished but output directory is still missing: {}", .dir.display())]
    OutputMissing { dir: PathBuf },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
