use axum::http::HeaderMap;
use dashmap::DashMap;
use std::time::{Duration, Instant};

// Shared bucket for requests with no usable forwarded-for header
pub const UNKNOWN_CLIENT: &str = "unknown";

// Rate limit entry - tracks requests per client key within one window
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at: Instant,
}

// Fixed-window rate limiter. Each handler owns its own instance with its own
// limit and window; counters live for the whole process and entries are never
// removed, so the map grows with the number of distinct client keys seen.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            limit,
            window,
        }
    }

    // true = allowed, false = over the limit for the current window
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();

        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                reset_at: now + self.window,
            });

        // window expired? start a fresh one
        if now > entry.reset_at {
            entry.count = 1;
            entry.reset_at = now + self.window;
            return true;
        }

        if entry.count < self.limit {
            entry.count += 1;
            return true;
        }

        false
    }
}

// Bucket key for a request: first hop of X-Forwarded-For, or the shared
// fallback bucket when the header is missing or empty.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').next().unwrap_or(s).trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
