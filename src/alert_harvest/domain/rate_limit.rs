/// Body phrases GitHub uses to mark abuse-detection (secondary) throttling.
const SECONDARY_LIMIT_MARKERS: [&str; 2] = ["secondary rate limit", "abuse"];

/// What the most recent throttling response disclosed about the remote quota.
///
/// Recomputed from every 403/429 response and threaded through the request
/// executor explicitly. Never persisted across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    /// Requests left in the current quota window, if disclosed.
    pub remaining: Option<u64>,
    /// Quota ceiling for the window, if disclosed.
    pub limit: Option<u64>,
    /// Epoch seconds at which the quota window rolls over.
    pub reset_epoch: Option<i64>,
    /// Explicit server-provided wait hint, in seconds.
    pub retry_after_secs: Option<u64>,
    /// Whether the response body carried abuse-detection wording.
    pub secondary: bool,
}

impl RateLimitSnapshot {
    /// The primary quota is spent: zero remaining requests in the window.
    pub fn quota_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Seconds until the quota window rolls over, floored at 1 so a reset
    /// timestamp in the past still produces a positive wait.
    pub fn seconds_until_reset(&self, now_epoch: i64) -> Option<u64> {
        self.reset_epoch
            .map(|reset| reset.saturating_sub(now_epoch).max(1) as u64)
    }
}

/// Whether a response body carries secondary-limit wording.
pub fn body_marks_secondary(body: &str) -> bool {
    let lowered = body.to_lowercase();
    SECONDARY_LIMIT_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}
