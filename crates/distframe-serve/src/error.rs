use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions of endpoint resolution and local serving.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("port {port} is already in use (is a server already running?)")]
    PortConflict { port: u16 },

    #[error("failed to start static server on port {port}: {source}")]
    ServerStartFailed {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("build directory not found: {}", .dir.display())]
    BuildDirectoryMissing { dir: PathBuf },

    #[error("{url} did not answer HTTP 200 after {attempts} attempts; check for port conflicts")]
    EndpointUnreachable { url: String, attempts: u32 },
}

impl ServeError {
    pub(crate) fn from_bind(err: std::io::Error, port: u16) -> Self {
        if err.kind() == std::io::ErrorKind::AddrInUse {
            Self::PortConflict { port }
        } else {
            Self::ServerStartFailed { port, source: err }
        }
    }
}
