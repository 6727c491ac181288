use clap::Parser;
use std::env;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "kitchen-buddy-api")]
#[command(about = "Backend API for the Kitchen Buddy fridge-photo recipe app")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Gemini API base URL
    #[arg(long, default_value = "https://generativelanguage.googleapis.com")]
    pub gemini_url: String,

    // Gemini model used for image analysis
    #[arg(long, default_value = "gemini-2.5-flash")]
    pub gemini_model: String,

    // Unsplash API base URL
    #[arg(long, default_value = "https://api.unsplash.com")]
    pub unsplash_url: String,

    // analyze-image rate limit max requests per window
    #[arg(long, default_value_t = 10)]
    pub analyze_rate_limit: u32,

    // analyze-image rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub analyze_rate_window: u64,

    // search-image rate limit max requests per window
    #[arg(long, default_value_t = 20)]
    pub search_rate_limit: u32,

    // search-image rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub search_rate_window: u64,

    // Gemini call timeout in seconds
    #[arg(long, default_value_t = 120)]
    pub analyze_timeout: u64,

    // Unsplash call timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub unsplash_timeout: u64,
}

// Upstream credentials, read from the environment at startup. Missing or
// empty values stay None; handlers surface that as a configuration error
// without naming the variable to the client.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub gemini_api_key: Option<String>,
    pub unsplash_access_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: read_key("GEMINI_API_KEY"),
            unsplash_access_key: read_key("UNSPLASH_ACCESS_KEY"),
        }
    }
}

fn read_key(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
