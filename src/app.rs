use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{health, quotes, search, sparkline, watchlists};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/quotes", quotes::router())
        .nest("/api/search", search::router())
        .nest("/api/watchlist", watchlists::router())
        .nest("/api/sparkline", sparkline::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
