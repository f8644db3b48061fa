use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use shared::config::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }
    let origins = config
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

/// Build and configure the application router
pub fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/api/About", get(handlers::about))
        // Market data routes
        .route(
            "/api/MarketData/LatestPrice/{symbol}",
            get(handlers::latest_price),
        )
        .route(
            "/api/MarketData/AggregatePrice/{symbol}",
            get(handlers::aggregate_price),
        )
        .route(
            "/api/MarketData/DetailedQuote/{symbol}",
            get(handlers::detailed_quote),
        )
        .route(
            "/api/MarketData/DetailedQuote/{symbol}/{interval}",
            get(handlers::detailed_quote_with_interval),
        )
        .route("/api/MarketData/Indices", get(handlers::indices))
        // Cache control routes
        .route(
            "/api/CacheControl/GetGlobalCacheStatus",
            get(handlers::get_global_cache_status),
        )
        .route(
            "/api/CacheControl/SetGlobalCacheStatus",
            post(handlers::set_global_cache_status),
        )
        .route(
            "/api/CacheControl/AppendToSymbolsList",
            post(handlers::append_to_symbols_list),
        )
        .route(
            "/api/CacheControl/ClearSymbolsList",
            post(handlers::clear_symbols_list),
        )
        .route(
            "/api/CacheControl/GetSymbolsList",
            get(handlers::get_symbols_list),
        )
        // Middleware
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(state)
}
