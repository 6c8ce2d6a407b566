//! HTTP reachability probe. Success means exactly HTTP 200.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Ready,
    /// Answered, but not with 200.
    Status(u16),
    /// Connection refused, DNS failure, timeout, TLS error...
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// One bounded GET against `url`.
pub trait Probe {
    fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome;
}

pub struct HttpProbe {
    agent: ureq::Agent,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("distframe/", env!("CARGO_PKG_VERSION")))
                .build(),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for HttpProbe {
    fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        match self.agent.get(url).timeout(timeout).call() {
            Ok(resp) if resp.status() == 200 => ProbeOutcome::Ready,
            Ok(resp) => ProbeOutcome::Status(resp.status()),
            Err(ureq::Error::Status(code, _)) => ProbeOutcome::Status(code),
            Err(ureq::Error::Transport(t)) => ProbeOutcome::Unreachable(t.to_string()),
        }
    }
}
