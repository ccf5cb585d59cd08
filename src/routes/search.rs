use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::services::symbol_search::{search_symbols, SymbolMatch};
use crate::state::AppState;

/// Queries up to this long that match nothing are offered as a raw ticker.
const MAX_DIRECT_SYMBOL_LEN: usize = 5;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
    /// Caller's query sequence number, echoed back so a UI can discard
    /// responses that arrive after a newer query was sent.
    seq: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub seq: Option<u64>,
    pub query: String,
    pub results: Vec<SymbolMatch>,
}

pub async fn search(Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let query = params.q.trim().to_string();
    info!("GET /api/search - q={:?} seq={:?}", query, params.seq);

    let mut results = search_symbols(&query);
    if let Some(suggestion) = direct_add_suggestion(&query, &results) {
        results.push(suggestion);
    }

    Json(SearchResponse {
        seq: params.seq,
        query,
        results,
    })
}

/// When the table has nothing, a short query is probably a ticker the user
/// wants to add as typed.
fn direct_add_suggestion(query: &str, results: &[SymbolMatch]) -> Option<SymbolMatch> {
    let len = query.chars().count();
    if !results.is_empty() || len == 0 || len > MAX_DIRECT_SYMBOL_LEN {
        return None;
    }

    let symbol = query.to_uppercase();
    Some(SymbolMatch {
        name: format!("Add {} directly", symbol),
        symbol,
    })
}
