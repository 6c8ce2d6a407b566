use anyhow::Result;
use std::time::Duration;

use distframe_core::config::PollConfig;
use distframe_serve::{HttpProbe, ReadinessPoller};

pub fn cmd_probe(
    url: &str,
    mut poll: PollConfig,
    attempts: Option<u32>,
    timeout_ms: Option<u64>,
    interval_ms: Option<u64>,
) -> Result<()> {
    if let Some(n) = attempts {
        if n == 0 {
            anyhow::bail!("--attempts must be at least 1");
        }
        poll.attempts = n;
    }
    if let Some(ms) = timeout_ms {
        poll.timeout = Duration::from_millis(ms);
    }
    if let Some(ms) = interval_ms {
        poll.interval = Duration::from_millis(ms);
    }

    let probe = HttpProbe::new();
    let ready = ReadinessPoller::new(&probe, poll).wait_ready(url)?;
    println!(
        "{} is ready (attempt {} of {}, {} ms)",
        ready.url,
        ready.attempts,
        poll.attempts,
        ready.elapsed.as_millis()
    );
    Ok(())
}
