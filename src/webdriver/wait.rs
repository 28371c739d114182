use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};

use crate::error::{Error, Result};

/// Condition-based polling with a hard deadline. There are no fixed pauses:
/// the probe runs immediately and then every `interval` until it yields a value.
#[derive(Debug, Clone, Copy)]
pub struct Wait {
    timeout: Duration,
    interval: Duration,
}

impl Wait {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Polls `probe` until it returns `Some`.
    ///
    /// Transient driver errors count as "not yet"; any other error ends the wait.
    /// Running out of time, including inside a probe that hangs, yields
    /// [`Error::SignalTimeout`] naming `what`.
    pub async fn until<T, F, Fut>(&self, what: &str, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let deadline = Instant::now() + self.timeout;
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let polled = match timeout_at(deadline, probe()).await {
                Ok(polled) => polled,
                Err(_) => {
                    tracing::debug!(condition = what, attempts, "probe still pending at the deadline");
                    return Err(Error::timeout(what, self.timeout));
                }
            };
            match polled {
                Ok(Some(value)) => {
                    tracing::debug!(condition = what, attempts, "condition met");
                    return Ok(value);
                }
                Ok(None) => {}
                Err(e) if e.is_transient() => {
                    tracing::debug!(condition = what, error = %e, "transient error while polling");
                }
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Error::timeout(what, self.timeout));
            }
            sleep(self.interval.min(deadline - now)).await;
        }
    }
}
