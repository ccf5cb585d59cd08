use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{normalize_symbol, Quote};
use crate::services::watchlist_service::{self, SparklineResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_sparkline))
}

#[derive(Debug, Deserialize)]
pub struct SparklineParams {
    positive: Option<bool>,
}

pub async fn get_sparkline(
    Path(symbol): Path<String>,
    Query(params): Query<SparklineParams>,
    State(state): State<AppState>,
) -> Result<Json<SparklineResponse>, AppError> {
    let symbol = normalize_symbol(&symbol)
        .ok_or_else(|| AppError::Validation(format!("{:?} is not a valid ticker symbol", symbol)))?;

    // Without an explicit trend, follow the tracked quote; default to rising.
    let positive = params.positive.unwrap_or_else(|| {
        state
            .watchlist
            .read()
            .get(&symbol)
            .map(Quote::is_positive)
            .unwrap_or(true)
    });

    info!("GET /api/sparkline/{} - positive={}", symbol, positive);
    let response = watchlist_service::sparkline_for(state.history.as_ref(), &symbol, positive).await;
    Ok(Json(response))
}
