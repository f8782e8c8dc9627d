//! Fixed-window requests-per-minute limiter shared by every call in a run.
//!
//! The window starts at the first call and resets once more than a minute has
//! passed; a burst can therefore straddle a window boundary and briefly exceed
//! the nominal rate.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

pub const WINDOW: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Time source for waiting; swapped for a manual clock in tests.
#[async_trait::async_trait]
pub trait Clock: Send + Sync {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;

    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: tokio::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

#[async_trait::async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Default)]
struct Window {
    started_at: Option<Duration>,
    count: u32,
}

pub struct RateLimiter {
    limit: Option<u32>,
    clock: Arc<dyn Clock>,
    window: Mutex<Window>,
}

impl RateLimiter {
    /// `limit_per_minute <= 0` disables limiting.
    pub fn new(limit_per_minute: i64) -> Self {
        Self::with_clock(limit_per_minute, Arc::new(SystemClock::default()))
    }

    pub fn unlimited() -> Self {
        Self::new(0)
    }

    pub fn with_clock(limit_per_minute: i64, clock: Arc<dyn Clock>) -> Self {
        let limit = (limit_per_minute > 0)
            .then(|| u32::try_from(limit_per_minute).unwrap_or(u32::MAX));
        Self {
            limit,
            clock,
            window: Mutex::new(Window::default()),
        }
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Waits until one more call fits in the current window, then claims it.
    pub async fn acquire(&self) {
        let Some(limit) = self.limit else {
            return;
        };

        let mut waited = false;
        loop {
            {
                let mut window = self.window.lock().await;
                let now = self.clock.now();
                let expired = window
                    .started_at
                    .map_or(true, |start| now.saturating_sub(start) > WINDOW);
                if expired {
                    window.started_at = Some(now);
                    window.count = 0;
                }
                if window.count < limit {
                    window.count += 1;
                    return;
                }
            }

            if !waited {
                tracing::info!(limit, "per-minute request limit reached, waiting for next window");
                waited = true;
            }
            self.clock.sleep(POLL_INTERVAL).await;
        }
    }
}
