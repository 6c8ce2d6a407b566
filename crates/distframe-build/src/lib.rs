//! Build trigger for distframe.
//!
//! When the build output directory is absent and a build manifest is present, run the
//! dependency install step and then the build step as two sequential external commands.
//! Any non-zero exit is fatal; there is no partial-build recovery.

mod command;
mod error;
mod trigger;

pub use command::{BuildCommand, BuildStep, CommandRunner, ProcessRunner};
pub use error::BuildError;
pub use trigger::{BuildDecision, BuildOutcome, BuildTrigger};
