use crate::api::error::ApiResult;
use crate::api::responses::{DetailedQuoteBody, IndicesBody, PriceBody};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

/// GET /api/MarketData/LatestPrice/{symbol}
pub async fn latest_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<PriceBody>> {
    info!("GET: latest price, symbol={}", symbol);
    let response = state.market_data.latest_price(&symbol).await?;
    Ok(Json(response.into()))
}

/// GET /api/MarketData/AggregatePrice/{symbol}
pub async fn aggregate_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<PriceBody>> {
    info!("GET: aggregate price, symbol={}", symbol);
    let response = state.market_data.aggregate_price(&symbol).await?;
    Ok(Json(response.into()))
}

/// GET /api/MarketData/DetailedQuote/{symbol}
pub async fn detailed_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<DetailedQuoteBody>> {
    info!("GET: detailed quote, symbol={}", symbol);
    let response = state.market_data.detailed_quote(&symbol, None).await?;
    Ok(Json(response.into()))
}

/// GET /api/MarketData/DetailedQuote/{symbol}/{interval}
pub async fn detailed_quote_with_interval(
    State(state): State<AppState>,
    Path((symbol, interval)): Path<(String, String)>,
) -> ApiResult<Json<DetailedQuoteBody>> {
    info!("GET: detailed quote, symbol={}, interval={}", symbol, interval);
    let response = state
        .market_data
        .detailed_quote(&symbol, Some(&interval))
        .await?;
    Ok(Json(response.into()))
}

/// GET /api/MarketData/Indices
pub async fn indices(State(state): State<AppState>) -> ApiResult<Json<IndicesBody>> {
    info!("GET: indices");
    let response = state.market_data.indices().await?;
    Ok(Json(response.into()))
}
