//! External install/build commands and the runner seam used to execute them.

use std::fmt;
use std::path::Path;
use std::process::Command;

use crate::error::BuildError;

/// Which of the two build steps a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Install,
    Build,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => f.write_str("install"),
            Self::Build => f.write_str("build"),
        }
    }
}

/// Shell builtins that `which` cannot resolve; lines starting with them skip the lookup.
const SHELL_BUILTINS: &[&str] = &["cd", "export", "set", "test", "[", "exec", ".", "source"];

/// A command line run through the platform shell (`sh -c` / `cmd /C`), so quoting,
/// `&&` chains and `VAR=value` prefixes behave as they do in a terminal.
///
/// `program` is the first word after any leading assignments. It is only used to
/// report a missing tool before spawning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub step: BuildStep,
    pub program: String,
    pub line: String,
}

impl BuildCommand {
    pub fn parse(step: BuildStep, line: &str) -> Result<Self, BuildError> {
        let line = line.trim();
        let program = line
            .split_whitespace()
            .find(|word| !is_assignment(word))
            .map(|word| word.trim_matches(|c| c == '"' || c == '\'').to_string())
            .filter(|word| !word.is_empty())
            .ok_or(BuildError::EmptyCommand { step })?;
        Ok(Self {
            step,
            program,
            line: line.to_string(),
        })
    }

    fn needs_lookup(&self) -> bool {
        !SHELL_BUILTINS.contains(&self.program.as_str())
    }
}

/// `NAME=value` prefix, as in `NODE_ENV=production npm run build`.
fn is_assignment(word: &str) -> bool {
    match word.split_once('=') {
        Some((name, _)) => {
            !name.is_empty()
                && name.chars().all(|c| c == '_' || c.is_ascii_alphanumeric())
                && !name.starts_with(|c: char| c.is_ascii_digit())
        }
        None => false,
    }
}

fn shell_command(line: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(line);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Runs one build command to completion in `cwd`.
pub trait CommandRunner {
    fn run(&self, command: &BuildCommand, cwd: &Path) -> Result<(), BuildError>;
}

/// Spawns real child processes. Blocks until the child exits; no timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &BuildCommand, cwd: &Path) -> Result<(), BuildError> {
        if command.needs_lookup() {
            which::which_in(&command.program, std::env::var_os("PATH"), cwd).map_err(|_| {
                BuildError::CommandNotFound {
                    program: command.program.clone(),
                }
            })?;
        }

        tracing::info!(step = %command.step, cwd = %cwd.display(), "Running `{}`", command);
        let status = shell_command(&command.line)
            .current_dir(cwd)
            .status()
            .map_err(|source| BuildError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(BuildError::CommandFailed {
                command: command.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }
}
