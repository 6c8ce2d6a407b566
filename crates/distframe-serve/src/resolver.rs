use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ServeError;
use crate::probe::Probe;

/// Where the embedded app will come from. Decided once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Remote published URL answered 200; no local server is needed.
    Remote { url: String },
    /// Serve this (existing) build directory locally.
    Local { root: PathBuf },
}

pub struct EndpointResolver<'a> {
    probe: &'a dyn Probe,
    remote_timeout: Duration,
}

impl<'a> EndpointResolver<'a> {
    pub fn new(probe: &'a dyn Probe, remote_timeout: Duration) -> Self {
        Self {
            probe,
            remote_timeout,
        }
    }

    /// A single bounded probe of `remote_url`; on failure or absence, fall back to
    /// `build_dir`, which must exist.
    pub fn resolve(
        &self,
        remote_url: Option<&str>,
        build_dir: &Path,
    ) -> Result<Resolution, ServeError> {
        if let Some(url) = remote_url {
            let outcome = self.probe.probe(url, self.remote_timeout);
            if outcome.is_ready() {
                tracing::info!(url, "Using remote published URL");
                return Ok(Resolution::Remote {
                    url: url.to_string(),
                });
            }
            tracing::warn!(url, outcome = ?outcome, "Remote URL not reachable, falling back to local server");
        }

        if !build_dir.is_dir() {
            return Err(ServeError::BuildDirectoryMissing {
                dir: build_dir.to_path_buf(),
            });
        }
        Ok(Resolution::Local {
            root: build_dir.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeOutcome;
    use std::cell::RefCell;

    struct FixedProbe {
        outcome: ProbeOutcome,
        seen: RefCell<Vec<(String, Duration)>>,
    }

    impl FixedProbe {
        fn new(outcome: ProbeOutcome) -> Self {
            Self {
                outcome,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Probe for FixedProbe {
        fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
            self.seen.borrow_mut().push((url.to_string(), timeout));
            self.outcome.clone()
        }
    }

    const REMOTE: &str = "https://example.github.io/app/";

    #[test]
    fn test_reachable_remote_wins_even_without_build() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = FixedProbe::new(ProbeOutcome::Ready);
        let resolver = EndpointResolver::new(&probe, Duration::from_secs(3));

        let res = resolver.resolve(Some(REMOTE), &tmp.path().join("dist")).unwrap();
        assert_eq!(res, Resolution::Remote { url: REMOTE.to_string() });
        assert_eq!(*probe.seen.borrow(), vec![(REMOTE.to_string(), Duration::from_secs(3))]);
    }

    #[test]
    fn test_unreachable_remote_falls_back_to_local() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = FixedProbe::new(ProbeOutcome::Unreachable("timed out".to_string()));
        let resolver = EndpointResolver::new(&probe, Duration::from_secs(3));

        let res = resolver.resolve(Some(REMOTE), tmp.path()).unwrap();
        assert_eq!(res, Resolution::Local { root: tmp.path().to_path_buf() });
        assert_eq!(probe.seen.borrow().len(), 1);
    }

    #[test]
    fn test_no_remote_does_not_probe() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = FixedProbe::new(ProbeOutcome::Ready);
        let resolver = EndpointResolver::new(&probe, Duration::from_secs(3));

        let res = resolver.resolve(None, tmp.path()).unwrap();
        assert!(matches!(res, Resolution::Local { .. }));
        assert!(probe.seen.borrow().is_empty());
    }

    #[test]
    fn test_fallback_without_build_dir_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("dist");
        let probe = FixedProbe::new(ProbeOutcome::Status(404));
        let resolver = EndpointResolver::new(&probe, Duration::from_secs(3));

        let err = resolver.resolve(Some(REMOTE), &missing).unwrap_err();
        assert!(matches!(err, ServeError::BuildDirectoryMissing { ref dir } if *dir == missing));
    }
}
