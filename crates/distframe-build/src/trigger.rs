use distframe_core::config::{BuildConfig, ProjectConfig};

use crate::command::{BuildCommand, BuildStep, CommandRunner};
use crate::error::BuildError;

/// What the trigger concluded from the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDecision {
    /// Output directory already exists; never build.
    OutputPresent,
    /// No output and no manifest: nothing can be built here.
    NoManifest,
    /// Output missing, manifest present.
    Needed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    AlreadyBuilt,
    NoManifest,
    /// Both commands exited 0 and the output directory now exists.
    Built,
}

pub struct BuildTrigger<'a> {
    project: &'a ProjectConfig,
    build: &'a BuildConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> BuildTrigger<'a> {
    pub fn new(
        project: &'a ProjectConfig,
        build: &'a BuildConfig,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            project,
            build,
            runner,
        }
    }

    pub fn decide(&self) -> BuildDecision {
        if self.project.build_dir.is_dir() {
            BuildDecision::OutputPresent
        } else if self.project.manifest.is_file() {
            BuildDecision::Needed
        } else {
            BuildDecision::NoManifest
        }
    }

    /// Build only when [`BuildDecision::Needed`].
    pub fn run(&self) -> Result<BuildOutcome, BuildError> {
        match self.decide() {
            BuildDecision::OutputPresent => {
                tracing::debug!(dir = %self.project.build_dir.display(), "Build output present, skipping build");
                Ok(BuildOutcome::AlreadyBuilt)
            }
            BuildDecision::NoManifest => {
                tracing::debug!(
                    manifest = %self.project.manifest.display(),
                    "No build output and no manifest, nothing to build"
                );
                Ok(BuildOutcome::NoManifest)
            }
            BuildDecision::Needed => {
                self.force_build()?;
                Ok(BuildOutcome::Built)
            }
        }
    }

    /// Run install then build regardless of existing output.
    /// Both command lines are validated before anything is spawned.
    pub fn force_build(&self) -> Result<(), BuildError> {
        let install = BuildCommand::parse(BuildStep::Install, &self.build.install_cmd)?;
        let build = BuildCommand::parse(BuildStep::Build, &self.build.build_cmd)?;

        for command in [&install, &build] {
            self.runner.run(command, &self.project.project_dir)?;
        }

        if !self.project.build_dir.is_dir() {
            return Err(BuildError::OutputMissing {
                dir: self.project.build_dir.clone(),
            });
        }
        tracing::info!(dir = %self.project.build_dir.display(), "Build complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;

    /// Records invocations and fakes the bundler's side effect.
    struct FakeRunner {
        calls: RefCell<Vec<String>>,
        create_output: bool,
        fail_on: Option<BuildStep>,
    }

    impl FakeRunner {
        fn new(create_output: bool, fail_on: Option<BuildStep>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                create_output,
                fail_on,
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, command: &BuildCommand, cwd: &Path) -> Result<(), BuildError> {
            self.calls.borrow_mut().push(command.to_string());
            if self.fail_on == Some(command.step) {
                return Err(BuildError::CommandFailed {
                    command: command.to_string(),
                    code: Some(1),
                });
            }
            if command.step == BuildStep::Build && self.create_output {
                std::fs::create_dir_all(cwd.join("dist")).unwrap();
            }
            Ok(())
        }
    }

    fn project(dir: &Path, with_manifest: bool, with_output: bool) -> ProjectConfig {
        if with_manifest {
            std::fs::write(dir.join("package.json"), "{}").unwrap();
        }
        if with_output {
            std::fs::create_dir_all(dir.join("dist")).unwrap();
        }
        ProjectConfig::new(dir)
    }

    #[test]
    fn test_existing_output_never_builds() {
        let tmp = tempfile::tempdir().unwrap();
        let project = project(tmp.path(), true, true);
        let build = BuildConfig::default();
        let runner = FakeRunner::new(true, None);
        let trigger = BuildTrigger::new(&project, &build, &runner);

        assert_eq!(trigger.decide(), BuildDecision::OutputPresent);
        assert_eq!(trigger.run().unwrap(), BuildOutcome::AlreadyBuilt);
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_no_manifest_does_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let project = project(tmp.path(), false, false);
        let build = BuildConfig::default();
        let runner = FakeRunner::new(true, None);
        let trigger = BuildTrigger::new(&project, &build, &runner);

        assert_eq!(trigger.run().unwrap(), BuildOutcome::NoManifest);
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_builds_install_then_build() {
        let tmp = tempfile::tempdir().unwrap();
        let project = project(tmp.path(), true, false);
        let build = BuildConfig::default();
        let runner = FakeRunner::new(true, None);
        let trigger = BuildTrigger::new(&project, &build, &runner);

        assert_eq!(trigger.run().unwrap(), BuildOutcome::Built);
        assert_eq!(
            *runner.calls.borrow(),
            vec!["npm install --silent", "npm run build --silent"]
        );
        assert_eq!(trigger.decide(), BuildDecision::OutputPresent);
    }

    #[test]
    fn test_install_failure_stops_before_build() {
        let tmp = tempfile::tempdir().unwrap();
        let project = project(tmp.path(), true, false);
        let build = BuildConfig::default();
        let runner = FakeRunner::new(true, Some(BuildStep::Install));
        let trigger = BuildTrigger::new(&project, &build, &runner);

        let err = trigger.run().unwrap_err();
        assert!(matches!(err, BuildError::CommandFailed { .. }));
        assert_eq!(runner.calls.borrow().len(), 1);
        assert!(!project.build_dir.exists());
    }

    #[test]
    fn test_build_without_output_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let project = project(tmp.path(), true, false);
        let build = BuildConfig::default();
        let runner = FakeRunner::new(false, None);
        let trigger = BuildTrigger::new(&project, &build, &runner);

        let err = trigger.run().unwrap_err();
        assert!(matches!(err, BuildError::OutputMissing { .. }));
    }

    #[test]
    fn test_empty_build_command_spawns_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let project = project(tmp.path(), true, false);
        let build = BuildConfig {
            install_cmd: "npm ci".to_string(),
            build_cmd: String::new(),
        };
        let runner = FakeRunner::new(true, None);
        let trigger = BuildTrigger::new(&project, &build, &runner);

        let err = trigger.run().unwrap_err();
        assert!(matches!(err, BuildError::EmptyCommand { step: BuildStep::Build }));
        assert!(runner.calls.borrow().is_empty());
    }
}
