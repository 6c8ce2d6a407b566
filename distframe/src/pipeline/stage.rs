use std::fmt;
use std::path::PathBuf;

/// What ended up embedded in the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Remote published URL that answered the reachability probe.
    Remote(String),
    /// Loopback URL of the local static server.
    Local(String),
    /// Entry file whose markup was injected directly.
    Inline(PathBuf),
}

impl Endpoint {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::Local(_) => "local",
            Self::Inline(_) => "inline",
        }
    }

    pub fn location(&self) -> String {
        match self {
            Self::Remote(url) | Self::Local(url) => url.clone(),
            Self::Inline(path) => path.display().to_string(),
        }
    }
}

/// States of one run. A successful build transitions back to [`Stage::NoBuild`], which
/// starts a fresh render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    NoBuild,
    Building,
    BuildReady,
    ResolvingEndpoint,
    RemoteReady { url: String },
    StartingLocalServer { root: PathBuf },
    Polling { url: String },
    LocalReady { url: String },
    Embedded { endpoint: Endpoint },
    Fatal,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoBuild => "NO_BUILD",
            Self::Building => "BUILDING",
            Self::BuildReady => "BUILD_READY",
            Self::ResolvingEndpoint => "RESOLVING_ENDPOINT",
            Self::RemoteReady { .. } => "REMOTE_READY",
            Self::StartingLocalServer { .. } => "STARTING_LOCAL_SERVER",
            Self::Polling { .. } => "POLLING",
            Self::LocalReady { .. } => "LOCAL_READY",
            Self::Embedded { .. } => "EMBEDDED",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
