//! Fixed-window admission limiter.
//!
//! A single budget counter is guarded by one mutex. Waiters park on a
//! [`Notify`] that is broadcast on every window reset, and all of them race
//! for the refilled budget.

use std::future::Future;
use std::pin::pin;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::error::{ConfigError, CrptError};
use crate::rate_limit::RateLimitConfig;

/// Admission limiter allowing at most `request_limit` acquisitions per window.
///
/// The limiter owns a background task that refills the budget once per
/// window, starting one full window after construction. The task is stopped
/// by [`RateLimiter::shutdown`] or when the limiter is dropped.
///
/// # Example
///
/// ```rust,no_run
/// use crpt_api_client::rate_limit::{RateLimitConfig, RateLimiter};
///
/// # async fn run() -> Result<(), crpt_api_client::CrptError> {
/// let limiter = RateLimiter::new(RateLimitConfig::per_second(3)?)?;
///
/// for _ in 0..3 {
///     limiter.acquire().await?; // returns immediately
/// }
/// limiter.acquire().await?; // waits for the next window
/// # Ok(())
/// # }
/// ```
pub struct RateLimiter {
    shared: Arc<Shared>,
    config: RateLimitConfig,
    driver: JoinHandle<()>,
}

struct Shared {
    limit: u32,
    state: Mutex<WindowState>,
    /// Broadcast on every reset and on shutdown
    reset: Notify,
}

#[derive(Debug)]
struct WindowState {
    /// Remaining admissions in the current window
    budget: u32,
    closed: bool,
}

impl Shared {
    /// Refill the budget and wake every waiter.
    ///
    /// Returns `false` once the limiter has been shut down.
    async fn reset_window(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.closed {
            return false;
        }

        let consumed = self.limit - state.budget;
        state.budget = self.limit;
        self.reset.notify_waiters();
        tracing::debug!(limit = self.limit, consumed, "rate limit window reset");
        true
    }
}

impl RateLimiter {
    /// Create a limiter with a full budget and start its reset task.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoRuntime`] when called outside a tokio runtime
    /// and [`ConfigError::WindowTooLarge`] when the window cannot be scheduled.
    pub fn new(config: RateLimitConfig) -> Result<Self, ConfigError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;

        // Windows are aligned to construction time. The ticker also needs the
        // deadline after the first one to be representable.
        let first_reset = Instant::now()
            .checked_add(config.window())
            .filter(|first| first.checked_add(config.window()).is_some())
            .ok_or(ConfigError::WindowTooLarge)?;

        let limit = config.request_limit();
        let shared = Arc::new(Shared {
            limit,
            state: Mutex::new(WindowState {
                budget: limit,
                closed: false,
            }),
            reset: Notify::new(),
        });

        let driver = handle.spawn(run_reset_driver(
            Arc::downgrade(&shared),
            first_reset,
            config.window(),
        ));

        tracing::info!(
            limit,
            window = ?config.window(),
            "rate limiter started"
        );

        Ok(Self {
            shared,
            config,
            driver,
        })
    }

    /// Wait until the current window has budget left, then consume one unit.
    ///
    /// Dropping the returned future before it completes consumes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CrptError::LimiterClosed`] if the limiter is shut down
    /// before or while waiting.
    pub async fn acquire(&self) -> Result<(), CrptError> {
        loop {
            // Register for the next reset before looking at the budget, so a
            // reset that lands between the check and the wait still wakes us.
            let mut notified = pin!(self.shared.reset.notified());
            notified.as_mut().enable();

            {
                let mut state = self.shared.state.lock().await;
                if state.closed {
                    return Err(CrptError::LimiterClosed);
                }
                if state.budget > 0 {
                    state.budget -= 1;
                    tracing::trace!(remaining = state.budget, "admission granted");
                    return Ok(());
                }
            }

            tracing::trace!("budget exhausted, waiting for window reset");
            notified.await;
        }
    }

    /// Like [`acquire`](Self::acquire), but gives up when `cancel` completes.
    ///
    /// # Errors
    ///
    /// Returns [`CrptError::Cancelled`] if `cancel` completes first. No budget
    /// is consumed in that case.
    pub async fn acquire_or_cancel<F>(&self, cancel: F) -> Result<(), CrptError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            result = self.acquire() => result,
            () = cancel => {
                tracing::trace!("admission wait cancelled");
                Err(CrptError::Cancelled)
            }
        }
    }

    /// Like [`acquire`](Self::acquire), but waits at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`CrptError::Timeout`] if no budget became available in time.
    /// No budget is consumed in that case.
    pub async fn acquire_timeout(&self, timeout: Duration) -> Result<(), CrptError> {
        tokio::time::timeout(timeout, self.acquire())
            .await
            .map_err(|_| CrptError::Timeout)?
    }

    /// Refill the budget to the full limit and wake every waiter.
    #[cfg(test)]
    pub(crate) async fn reset_window(&self) {
        self.shared.reset_window().await;
    }

    /// Stop the reset task and release every waiter with
    /// [`CrptError::LimiterClosed`].
    pub async fn shutdown(&self) {
        let mut state = self.shared.state.lock().await;
        if state.closed {
            return;
        }

        state.closed = true;
        self.driver.abort();
        self.shared.reset.notify_waiters();
        tracing::info!(remaining = state.budget, "rate limiter shut down");
    }

    /// Remaining admissions in the current window.
    pub async fn budget(&self) -> u32 {
        self.shared.state.lock().await.budget
    }

    /// Check if the limiter has been shut down.
    pub async fn is_closed(&self) -> bool {
        self.shared.state.lock().await.closed
    }

    /// Maximum admissions per window.
    pub fn limit(&self) -> u32 {
        self.shared.limit
    }

    /// Length of one window.
    pub fn window(&self) -> Duration {
        self.config.window()
    }

    /// Get the configuration this limiter was built with.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("limit", &self.shared.limit)
            .field("window", &self.config.window())
            .finish()
    }
}

async fn run_reset_driver(shared: Weak<Shared>, first_reset: Instant, window: Duration) {
    let mut ticker = interval_at(first_reset, window);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let Some(shared) = shared.upgrade() else {
            break;
        };
        if !shared.reset_window().await {
            break;
        }
    }

    tracing::debug!("rate limit reset task stopped");
}
