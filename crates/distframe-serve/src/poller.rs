use std::time::{Duration, Instant};

use distframe_core::config::PollConfig;

use crate::error::ServeError;
use crate::probe::{Probe, ProbeOutcome};

/// Result of a successful readiness poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub url: String,
    /// 1-based attempt that first saw HTTP 200.
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Bounded retry loop: probe, sleep, repeat, until HTTP 200 or the budget is spent.
pub struct ReadinessPoller<'a> {
    probe: &'a dyn Probe,
    config: PollConfig,
}

impl<'a> ReadinessPoller<'a> {
    pub fn new(probe: &'a dyn Probe, config: PollConfig) -> Self {
        Self { probe, config }
    }

    pub fn wait_ready(&self, url: &str) -> Result<Readiness, ServeError> {
        let started = Instant::now();
        let budget = self.config.attempts;
        let mut last = ProbeOutcome::Unreachable("not probed".to_string());

        for attempt in 1..=budget {
            last = self.probe.probe(url, self.config.timeout);
            if last.is_ready() {
                let elapsed = started.elapsed();
                tracing::info!(url, attempt, elapsed_ms = elapsed.as_millis() as u64, "Endpoint ready");
                return Ok(Readiness {
                    url: url.to_string(),
                    attempts: attempt,
                    elapsed,
                });
            }
            tracing::debug!(url, attempt, outcome = ?last, "Endpoint not ready yet");
            if attempt < budget {
                std::thread::sleep(self.config.interval);
            }
        }

        tracing::warn!(url, attempts = budget, last = ?last, "Readiness budget exhausted");
        Err(ServeError::EndpointUnreachable {
            url: url.to_string(),
            attempts: budget,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fails `failures` times, then answers 200.
    struct ScriptedProbe {
        failures: u32,
        calls: Cell<u32>,
    }

    impl ScriptedProbe {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: Cell::new(0),
            }
        }
    }

    impl Probe for ScriptedProbe {
        fn probe(&self, _url: &str, _timeout: Duration) -> ProbeOutcome {
            let n = self.calls.get() + 1;
            self.calls.set(n);
            if n > self.failures {
                ProbeOutcome::Ready
            } else if n % 2 == 0 {
                ProbeOutcome::Status(503)
            } else {
                ProbeOutcome::Unreachable("connection refused".to_string())
            }
        }
    }

    fn fast(attempts: u32) -> PollConfig {
        PollConfig {
            attempts,
            timeout: Duration::from_millis(10),
            interval: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_stops_on_first_200() {
        let probe = ScriptedProbe::new(2);
        let ready = ReadinessPoller::new(&probe, fast(30))
            .wait_ready("http://127.0.0.1:3002/")
            .unwrap();
        assert_eq!(ready.attempts, 3);
        assert_eq!(probe.calls.get(), 3);
    }

    #[test]
    fn test_never_exceeds_budget() {
        let probe = ScriptedProbe::new(u32::MAX);
        let config = fast(4);
        let started = Instant::now();
        let err = ReadinessPoller::new(&probe, config)
            .wait_ready("http://127.0.0.1:3002/")
            .unwrap_err();

        assert_eq!(probe.calls.get(), 4);
        assert!(matches!(err, ServeError::EndpointUnreachable { attempts: 4, ref url } if url == "http://127.0.0.1:3002/"));
        assert!(started.elapsed() < config.worst_case() + Duration::from_secs(1));
    }

    #[test]
    fn test_non_200_is_not_ready() {
        struct Always204;
        impl Probe for Always204 {
            fn probe(&self, _url: &str, _timeout: Duration) -> ProbeOutcome {
                ProbeOutcome::Status(204)
            }
        }
        let err = ReadinessPoller::new(&Always204, fast(2))
            .wait_ready("http://x/")
            .unwrap_err();
        assert!(matches!(err, ServeError::EndpointUnreachable { attempts: 2, .. }));
    }

    #[test]
    fn test_real_server_ready_on_first_probe() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("index.html"), "ok").unwrap();
        let server = crate::StaticServer::start(tmp.path(), "127.0.0.1", 0, "index.html").unwrap();

        let probe = crate::HttpProbe::new();
        let ready = ReadinessPoller::new(&probe, PollConfig::default())
            .wait_ready(&server.local_url())
            .unwrap();
        assert_eq!(ready.attempts, 1);
        assert!(ready.elapsed <= Duration::from_secs(1));
    }
}
