//! Core API rate limit handling for GitHub listing calls.

use octocrab::Octocrab;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Maximum time to wait for rate limit reset (1 hour).
const MAX_WAIT_SECS: u64 = 3600;

/// Minimum remaining requests before proactively waiting.
const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Snapshot of the core API rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Unix timestamp when the rate limit resets.
    pub reset: u64,
    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// How long to pause before the next request, given the current Unix time.
    ///
    /// Returns `None` while enough requests remain or once the window has reset.
    /// Waits are capped at one hour.
    #[must_use]
    pub fn wait_duration(&self, now: u64) -> Option<Duration> {
        if self.remaining >= MIN_REMAINING_THRESHOLD || self.reset <= now {
            return None;
        }

        let wait_secs = self.reset - now;
        if wait_secs > MAX_WAIT_SECS {
            warn!(
                wait_secs,
                max_wait = MAX_WAIT_SECS,
                "Rate limit reset too far in future, capping wait time"
            );
        }
        Some(Duration::from_secs(wait_secs.min(MAX_WAIT_SECS)))
    }
}

/// Fetches the core API rate limit.
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_core_rate_limit(octocrab: &Octocrab) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: core.remaining as u32,
        reset: core.reset,
        limit: core.limit as u32,
    })
}

/// Sleeps until the core window resets when it is nearly exhausted.
///
/// # Errors
///
/// Returns an error if the rate limit check fails.
pub async fn ensure_core_rate_limit(octocrab: &Octocrab) -> Result<(), octocrab::Error> {
    let info = check_core_rate_limit(octocrab).await?;
    if let Some(wait) = info.wait_duration(unix_now()) {
        info!(
            remaining = info.remaining,
            wait_secs = wait.as_secs(),
            "Rate limit low, waiting for reset"
        );
        tokio::time::sleep(wait).await;
    }
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
