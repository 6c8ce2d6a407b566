use distframe_build::BuildError;
use distframe_embed::EmbedError;
use distframe_serve::ServeError;
use thiserror::Error;

use super::Stage;

/// Terminal error of a render pass.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Serve(#[from] ServeError),

    #[error(transparent)]
    Embed(#[from] EmbedError),
}

/// A run that ended in [`Stage::Fatal`], with the path it took to get there.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RunFailure {
    pub error: RunError,
    pub passes: u32,
    /// Every stage entered, ending with `FATAL`.
    pub stages: Vec<Stage>,
}
