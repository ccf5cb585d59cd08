use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{AddWatchlistItemRequest, Quote, WatchlistFilterParams};
use crate::services::watchlist_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // specific routes before parameterized ones
        .route("/refresh", post(refresh_watchlist))
        .route("/", get(list_watchlist).post(add_item))
        .route("/:symbol", delete(remove_item))
}

pub async fn list_watchlist(
    Query(params): Query<WatchlistFilterParams>,
    State(state): State<AppState>,
) -> Json<Vec<Quote>> {
    let filter = params.filter.unwrap_or_default();
    info!("GET /api/watchlist - filter={:?}", filter);
    let quotes = state.watchlist.read().filter(&filter);
    Json(quotes)
}

pub async fn add_item(
    State(state): State<AppState>,
    Json(req): Json<AddWatchlistItemRequest>,
) -> Result<(StatusCode, Json<Vec<Quote>>), AppError> {
    info!("POST /api/watchlist - Adding {}", req.symbol);
    let added = watchlist_service::add_symbol(&state.resolver, &state.watchlist, &req.symbol)
        .await
        .map_err(|e| {
            match &e {
                AppError::Duplicate(_) | AppError::Validation(_) => warn!("Rejected add of {}: {}", req.symbol, e),
                _ => error!("Failed to add {}: {}", req.symbol, e),
            }
            e
        })?;
    Ok((StatusCode::CREATED, Json(added)))
}

pub async fn remove_item(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/watchlist/{} - Removing", symbol);
    watchlist_service::remove_symbol(&state.watchlist, &symbol)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn refresh_watchlist(State(state): State<AppState>) -> Json<Vec<Quote>> {
    info!("POST /api/watchlist/refresh - Refreshing quotes");
    let quotes = watchlist_service::refresh(&state.resolver, &state.watchlist).await;
    Json(quotes)
}
