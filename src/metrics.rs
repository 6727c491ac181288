use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, register_counter, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("kitchen_buddy_requests_total", "Total number of requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter =
        register_counter!("kitchen_buddy_rate_limited_total", "Requests denied by a rate limiter")
            .unwrap();
    pub static ref SEARCH_DEGRADED_TOTAL: Counter = register_counter!(
        "kitchen_buddy_search_degraded_total",
        "Image searches that degraded to a null result"
    )
    .unwrap();
    pub static ref ANALYZE_LATENCY: Histogram = register_histogram!(
        "kitchen_buddy_analyze_latency_seconds",
        "Image analysis latency in seconds"
    )
    .unwrap();
    pub static ref SEARCH_LATENCY: Histogram = register_histogram!(
        "kitchen_buddy_search_latency_seconds",
        "Image search latency in seconds"
    )
    .unwrap();
}
