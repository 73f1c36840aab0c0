//! Rate limiting for the CRPT registry API.
//!
//! The registry accepts at most a fixed number of document submissions per
//! time window. This module provides a fixed-window admission limiter that is
//! shared by every task submitting through one client.
//!
//! ## Window Semantics
//!
//! - Windows are aligned to the moment the limiter is created, not to the
//!   first request.
//! - The budget starts full and is reset to the full limit at the end of every
//!   window, no matter how much of it was used.
//! - Requests clustered around a window boundary may therefore see up to twice
//!   the limit within slightly more than one window.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use crpt_api_client::rate_limit::{RateLimitConfig, RateLimiter};
//!
//! # async fn run() -> Result<(), crpt_api_client::CrptError> {
//! let config = RateLimitConfig::new(10, Duration::from_secs(1))?;
//! let limiter = RateLimiter::new(config)?;
//!
//! // Waits until the current window has budget left
//! limiter.acquire().await?;
//! # Ok(())
//! # }
//! ```

mod limiter;

pub use limiter::RateLimiter;

use std::time::Duration;

use crate::error::ConfigError;

/// Rate limiter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum number of admissions per window.
    request_limit: u32,
    /// Length of one window.
    window: Duration,
}

impl RateLimitConfig {
    /// Create a new configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroRequestLimit`] if `request_limit` is zero and
    /// [`ConfigError::ZeroWindow`] if `window` is zero.
    pub fn new(request_limit: u32, window: Duration) -> Result<Self, ConfigError> {
        if request_limit == 0 {
            return Err(ConfigError::ZeroRequestLimit);
        }
        if window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(Self {
            request_limit,
            window,
        })
    }

    /// At most `request_limit` submissions per second.
    pub fn per_second(request_limit: u32) -> Result<Self, ConfigError> {
        Self::new(request_limit, Duration::from_secs(1))
    }

    /// At most `request_limit` submissions per minute.
    pub fn per_minute(request_limit: u32) -> Result<Self, ConfigError> {
        Self::new(request_limit, Duration::from_secs(60))
    }

    /// Maximum number of admissions per window.
    pub fn request_limit(&self) -> u32 {
        self.request_limit
    }

    /// Length of one window.
    pub fn window(&self) -> Duration {
        self.window
    }
}
