use std::future::Future;
use std::time::{Duration, Instant};

/// How long the page driver keeps looking for an element before giving up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            interval: Duration::from_millis(100),
        }
    }
}

impl WaitConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Run `probe` until it yields a value or the timeout elapses
    ///
    /// The probe always runs at least once, even with a zero timeout.
    pub async fn poll_until<T, F, Fut>(&self, mut probe: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(value) = probe().await {
                return Some(value);
            }
            if Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick() -> WaitConfig {
        WaitConfig {
            timeout: Duration::from_millis(200),
            interval: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_default_matches_thirty_seconds() {
        let wait = WaitConfig::default();
        assert_eq!(wait.timeout_ms(), 30_000);
        assert_eq!(wait.interval, Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_poll_returns_once_probe_succeeds() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let value = quick()
            .poll_until(move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                (n >= 3).then_some(n)
            })
            .await;

        assert_eq!(value, Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_gives_up_after_timeout() {
        let started = Instant::now();

        let value: Option<()> = quick().poll_until(|| async { None }).await;

        assert!(value.is_none());
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_zero_timeout_still_probes_once() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let wait = WaitConfig::with_timeout(Duration::ZERO);

        let value: Option<()> = wait
            .poll_until(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                None
            })
            .await;

        assert!(value.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
