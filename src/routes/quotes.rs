use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::config::MAX_SYMBOLS;
use crate::errors::AppError;
use crate::models::{normalize_symbol, Quote};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_quotes))
}

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    symbols: Option<String>,
}

pub async fn get_quotes(
    Query(params): Query<QuoteParams>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Quote>>, AppError> {
    let symbols: Vec<String> = params
        .symbols
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| normalize_symbol(s).ok_or_else(|| AppError::Validation(format!("{:?} is not a valid ticker symbol", s))))
        .collect::<Result<_, _>>()?;

    if symbols.len() > MAX_SYMBOLS {
        return Err(AppError::Validation(format!(
            "at most {} symbols per request",
            MAX_SYMBOLS
        )));
    }

    info!("GET /api/quotes - Resolving {:?}", symbols);
    let quotes = state.resolver.resolve_quotes(&symbols).await;
    Ok(Json(quotes))
}
