use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Rate-limit window as reported by the `X-RateLimit-*` response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: DateTime<Utc>,
}

impl RateLimit {
    /// Returns a snapshot only when all three headers are present and numeric.
    /// A malformed value counts as absent.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = header_value::<u64>(headers, RATE_LIMIT_LIMIT)?;
        let remaining = header_value::<u64>(headers, RATE_LIMIT_REMAINING)?;
        let reset_secs = header_value::<i64>(headers, RATE_LIMIT_RESET)?;
        let reset = DateTime::<Utc>::from_timestamp(reset_secs, 0)?;
        Some(Self {
            limit,
            remaining,
            reset,
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    let raw = headers.get(name)?;
    let parsed = raw
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok());
    if parsed.is_none() {
        debug!(header = name, value = ?raw, "ignoring malformed rate-limit header");
    }
    parsed
}
