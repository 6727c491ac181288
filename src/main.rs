use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

mod config;
mod error;
mod handlers;
mod metrics;
mod models;
mod rate_limit;
mod state;
mod upstream;

use config::{Args, Credentials};
use error::ApiError;
use handlers::{
    analyze_handler, download_handler, health_handler, metrics_handler, search_handler,
};
use state::AppState;

// this is main async function with tokio
#[tokio::main]
async fn main() {
    dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // parse cli arguments
    let args = Args::parse();

    let credentials = Credentials::from_env();
    if credentials.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; analyze-image will return a configuration error");
    }
    if credentials.unsplash_access_key.is_none() {
        warn!(
            "UNSPLASH_ACCESS_KEY is not set; search-image and trigger-download will return a configuration error"
        );
    }

    // creating shared state
    let state = Arc::new(AppState::new(&args, credentials));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr).await.unwrap();

    info!("Kitchen Buddy API running on http://localhost:{}", args.port);
    info!("Gemini upstream: {} (model {})", args.gemini_url, args.gemini_model);
    info!("Unsplash upstream: {}", args.unsplash_url);
    info!(
        "Rate limits: analyze {} per {}s, search {} per {}s",
        args.analyze_rate_limit,
        args.analyze_rate_window,
        args.search_rate_limit,
        args.search_rate_window
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

// creating the router with routes
fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/analyze-image", post(analyze_handler))
        .route("/api/search-image", post(search_handler))
        .route("/api/trigger-download", post(download_handler))
        .method_not_allowed_fallback(method_not_allowed)
        // axum's 2 MiB default would reject full-size image data-URLs
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
        .layer(cors)
        .with_state(state)
}

// wrong-method requests get the same JSON error shape as everything else
async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
