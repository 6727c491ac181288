use std::sync::Arc;
use std::time::Duration;

use crate::config::{Args, Credentials};
use crate::rate_limit::RateLimiter;
use crate::upstream::{GeminiApi, GeminiClient, UnsplashApi, UnsplashClient};

// app's shared state

pub struct AppState {
    pub gemini: Option<Arc<dyn GeminiApi>>,     // None until GEMINI_API_KEY is set
    pub unsplash: Option<Arc<dyn UnsplashApi>>, // None until UNSPLASH_ACCESS_KEY is set
    pub analyze_limiter: RateLimiter,
    pub search_limiter: RateLimiter,
}

impl AppState {
    pub fn new(args: &Args, credentials: Credentials) -> Self {
        let gemini = credentials.gemini_api_key.map(|key| {
            Arc::new(GeminiClient::new(
                key,
                args.gemini_url.clone(),
                args.gemini_model.clone(),
                Duration::from_secs(args.analyze_timeout),
            )) as Arc<dyn GeminiApi>
        });

        let unsplash = credentials.unsplash_access_key.map(|key| {
            Arc::new(UnsplashClient::new(
                key,
                args.unsplash_url.clone(),
                Duration::from_secs(args.unsplash_timeout),
            )) as Arc<dyn UnsplashApi>
        });

        Self {
            gemini,
            unsplash,
            analyze_limiter: RateLimiter::new(
                args.analyze_rate_limit,
                Duration::from_secs(args.analyze_rate_window),
            ),
            search_limiter: RateLimiter::new(
                args.search_rate_limit,
                Duration::from_secs(args.search_rate_window),
            ),
        }
    }
}
