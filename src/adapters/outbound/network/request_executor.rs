use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use tracing::warn;

use crate::alert_harvest::domain::rate_limit::{body_marks_secondary, RateLimitSnapshot};
use crate::ports::outbound::{ApiResponse, HttpGateway};
use crate::shared::{Result, COMPONENT};

/// Safety margin added to every computed throttling wait, in seconds.
const WAIT_BUFFER_SECS: u64 = 1;

/// Base of the secondary-limit exponential backoff, in seconds.
const SECONDARY_BACKOFF_BASE_SECS: u64 = 60;

/// Default cap on attempts against one endpoint before the run is abandoned.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Terminal outcome of a rate-limited request.
///
/// A tagged result rather than an error so callers must decide explicitly
/// what a spent retry budget means for them.
#[derive(Debug)]
pub enum Execution {
    /// The remote answered with a non-throttling status. This includes 404
    /// (a valid terminal outcome for optional sub-resources) and genuine
    /// authorization failures, which are never retried here.
    Completed(ApiResponse),
    /// Every attempt was throttled; no further request was issued.
    Exhausted { attempts: u32 },
}

/// How long to wait before retrying a throttled request, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThrottleWait {
    /// The server said exactly how long to wait.
    RetryAfter(u64),
    /// Primary quota spent; wait until the window rolls over.
    QuotaReset(u64),
    /// Abuse-detection throttling with no explicit hint; back off
    /// exponentially at 60 * 2^attempt seconds.
    SecondaryBackoff(u64),
}

impl ThrottleWait {
    fn seconds(self) -> u64 {
        match self {
            ThrottleWait::RetryAfter(secs)
            | ThrottleWait::QuotaReset(secs)
            | ThrottleWait::SecondaryBackoff(secs) => secs,
        }
    }
}

/// RateLimitedExecutor - issues single GET requests under the shared quota
///
/// Wraps an [`HttpGateway`] with the reactive half of the throttling
/// contract: on a 403/429 classified as rate limiting it sleeps and retries,
/// up to `max_attempts` times. Everything the upstream disclosed about the
/// quota in the most recent throttled response is kept in an explicit
/// [`RateLimitSnapshot`] rather than hidden module state.
pub struct RateLimitedExecutor<G: HttpGateway> {
    gateway: G,
    max_attempts: u32,
    last_snapshot: Mutex<Option<RateLimitSnapshot>>,
}

impl<G: HttpGateway> RateLimitedExecutor<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_max_attempts(gateway, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(gateway: G, max_attempts: u32) -> Self {
        Self {
            gateway,
            max_attempts,
            last_snapshot: Mutex::new(None),
        }
    }

    /// The snapshot taken from the most recent throttled response, if any.
    pub fn last_snapshot(&self) -> Option<RateLimitSnapshot> {
        self.last_snapshot.lock().expect("snapshot lock").clone()
    }

    #[cfg(test)]
    pub(crate) fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Issue `url` with `query` until a terminal outcome.
    ///
    /// Returns `Execution::Completed` for any non-throttling status (200,
    /// 404, genuine 403s, 5xx alike) and `Execution::Exhausted` once
    /// `max_attempts` consecutive responses were classified as throttling.
    /// Only transport failures surface as `Err`.
    pub async fn execute(&self, url: &str, query: &[(String, String)]) -> Result<Execution> {
        for attempt in 0..self.max_attempts {
            let response = self.gateway.get(url, query).await?;

            if response.status != 403 && response.status != 429 {
                return Ok(Execution::Completed(response));
            }

            let snapshot = snapshot_of(&response);
            let wait = classify_throttle(
                response.status,
                &snapshot,
                attempt,
                Utc::now().timestamp(),
            );
            *self.last_snapshot.lock().expect("snapshot lock") = Some(snapshot);

            let Some(wait) = wait else {
                // A 403 with quota to spare and no retry hint is a genuine
                // authorization failure; masking it as throttling would retry
                // forever against a permission wall.
                return Ok(Execution::Completed(response));
            };

            // No wait after the final attempt; nothing will be issued after it.
            if attempt + 1 == self.max_attempts {
                break;
            }

            let wait_secs = wait.seconds() + WAIT_BUFFER_SECS;
            warn!(
                component = COMPONENT,
                url,
                status = response.status,
                attempt,
                wait_secs,
                cause = ?wait,
                "throttled by upstream, backing off"
            );
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Ok(Execution::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

/// Extract the rate-limit surface of a response into a snapshot.
fn snapshot_of(response: &ApiResponse) -> RateLimitSnapshot {
    RateLimitSnapshot {
        remaining: response.header_u64("x-ratelimit-remaining"),
        limit: response.header_u64("x-ratelimit-limit"),
        reset_epoch: response.header_i64("x-ratelimit-reset"),
        retry_after_secs: response.header_u64("retry-after"),
        secondary: body_marks_secondary(&response.body),
    }
}

/// Classify a 403/429 response, in priority order: explicit `Retry-After`,
/// then spent primary quota with a known reset, then secondary throttling.
/// `None` means the response is not throttling and must pass through.
fn classify_throttle(
    status: u16,
    snapshot: &RateLimitSnapshot,
    attempt: u32,
    now_epoch: i64,
) -> Option<ThrottleWait> {
    if status != 403 && status != 429 {
        return None;
    }

    if let Some(secs) = snapshot.retry_after_secs {
        return Some(ThrottleWait::RetryAfter(secs));
    }

    if snapshot.quota_exhausted() {
        if let Some(secs) = snapshot.seconds_until_reset(now_epoch) {
            return Some(ThrottleWait::QuotaReset(secs));
        }
    }

    // 429 is always a throttle. A 403 needs the abuse-detection wording to
    // count; otherwise it is a permission error the caller must see.
    if status == 429 || snapshot.secondary {
        return Some(ThrottleWait::SecondaryBackoff(
            SECONDARY_BACKOFF_BASE_SECS * 2u64.pow(attempt),
        ));
    }

    None
}
