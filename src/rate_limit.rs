//! Per-client request limiting.
//!
//! Each client address gets a fixed window that opens on its first request.
//! Up to `max_requests` calls are allowed inside the window; afterwards the
//! address is rejected until the window ends. An expired entry is removed
//! entirely, so the next request opens a fresh window as if the client had
//! never been seen. A burst right after expiry is therefore allowed again;
//! this is not a rolling window.
//!
//! Expiry is checked lazily on access; [`RateLimiter::sweep`] drops stale
//! entries for addresses that stopped calling.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

/// Configuration for rate limiting.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in one window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

impl RateLimitConfig {
    /// Create a new rate limit configuration.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

impl Default for RateLimitConfig {
    /// Five requests per minute.
    fn default() -> Self {
        Self::new(5, 60)
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed.
    Allowed,
    /// Request is rejected.
    Denied {
        /// Time until the window ends.
        retry_after: Duration,
    },
}

impl RateLimitResult {
    /// Check if the request is allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed)
    }
}

#[derive(Debug, Clone, Copy)]
struct Counter {
    count: u32,
    window_start: Instant,
}

/// Fixed-window limiter keyed by client address.
///
/// Every check-increment-delete sequence runs under one mutex.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    counters: Mutex<HashMap<String, Counter>>,
}

impl RateLimiter {
    /// Create a new rate limiter.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Counter>> {
        // The map is always left consistent, so a poisoned lock is still usable.
        self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether a request from `addr` is allowed now.
    pub fn allow(&self, addr: &str) -> bool {
        self.check(addr).is_allowed()
    }

    /// Check and count a request from `addr`.
    pub fn check(&self, addr: &str) -> RateLimitResult {
        self.check_at(addr, Instant::now())
    }

    /// Check and count a request from `addr` as of `now`.
    pub fn check_at(&self, addr: &str, now: Instant) -> RateLimitResult {
        let mut counters = self.lock();

        if let Some(counter) = counters.get(addr) {
            if now.saturating_duration_since(counter.window_start) >= self.config.window {
                counters.remove(addr);
            }
        }

        match counters.get_mut(addr) {
            None => {
                counters.insert(
                    addr.to_string(),
                    Counter {
                        count: 1,
                        window_start: now,
                    },
                );
                RateLimitResult::Allowed
            }
            Some(counter) if counter.count < self.config.max_requests => {
                counter.count += 1;
                RateLimitResult::Allowed
            }
            Some(counter) => {
                let elapsed = now.saturating_duration_since(counter.window_start);
                RateLimitResult::Denied {
                    retry_after: self.config.window.saturating_sub(elapsed),
                }
            }
        }
    }

    /// Drop entries whose window has ended. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Drop entries whose window has ended as of `now`.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut counters = self.lock();
        let before = counters.len();
        let window = self.config.window;
        counters.retain(|_, c| now.saturating_duration_since(c.window_start) < window);
        before - counters.len()
    }

    /// Number of tracked addresses.
    pub fn tracked(&self) -> usize {
        self.lock().len()
    }

    /// Start a background task that sweeps every `interval`.
    pub fn start_sweep_task(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Skip the first immediate tick
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let removed = self.sweep();
                if removed > 0 {
                    debug!(removed, "Swept expired rate limit entries");
                }
            }
        })
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
