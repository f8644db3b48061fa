use crate::api::error::{ApiError, ApiResult};
use crate::api::responses::{GlobalCacheStatusResponse, SymbolsListResponse};
use crate::state::AppState;
use axum::{Json, extract::State, http::HeaderMap};
use quote_engine::planes::control::parse_symbols_csv;
use shared::Error;
use tracing::info;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> ApiResult<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError(Error::InvalidInput(format!("missing header '{}'", name))))
}

/// GET /api/CacheControl/GetGlobalCacheStatus
pub async fn get_global_cache_status(
    State(state): State<AppState>,
) -> ApiResult<Json<GlobalCacheStatusResponse>> {
    info!("GET: global cache status");
    let disabled = state.cache_control.get_global_disable().await?;
    Ok(Json(GlobalCacheStatusResponse {
        is_global_cache_disabled: disabled,
    }))
}

/// POST /api/CacheControl/SetGlobalCacheStatus (header `status: true|false`)
pub async fn set_global_cache_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<GlobalCacheStatusResponse>> {
    let raw = header(&headers, "status")?;
    let disabled = raw.trim().to_ascii_lowercase().parse::<bool>().map_err(|_| {
        ApiError(Error::InvalidInput(format!(
            "status must be true or false, got '{}'",
            raw
        )))
    })?;
    info!("POST: set global cache status, disabled={}", disabled);

    state.cache_control.set_global_disable(disabled).await?;
    Ok(Json(GlobalCacheStatusResponse {
        is_global_cache_disabled: disabled,
    }))
}

/// POST /api/CacheControl/AppendToSymbolsList (header `symbols: a,b,c`)
pub async fn append_to_symbols_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SymbolsListResponse>> {
    let symbols = parse_symbols_csv(header(&headers, "symbols")?);
    info!("POST: append to symbols list, symbols={:?}", symbols);

    state.cache_control.append_disabled_symbols(symbols).await?;
    let symbols = state.cache_control.get_disabled_symbols().await?;
    Ok(Json(SymbolsListResponse { symbols }))
}

/// POST /api/CacheControl/ClearSymbolsList
pub async fn clear_symbols_list(
    State(state): State<AppState>,
) -> ApiResult<Json<SymbolsListResponse>> {
    info!("POST: clear symbols list");
    state.cache_control.clear_disabled_symbols().await?;
    Ok(Json(SymbolsListResponse {
        symbols: Vec::new(),
    }))
}

/// GET /api/CacheControl/GetSymbolsList
pub async fn get_symbols_list(
    State(state): State<AppState>,
) -> ApiResult<Json<SymbolsListResponse>> {
    info!("GET: symbols list");
    let symbols = state.cache_control.get_disabled_symbols().await?;
    Ok(Json(SymbolsListResponse { symbols }))
}
