// tests/api_routes_test.rs
//
// Drives the router end to end with in-process fake providers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use watchlist_backend::app::create_app;
use watchlist_backend::external::price_provider::{
    HistoryProvider, PriceProviderError, ProviderResult, QuoteProvider,
};
use watchlist_backend::external::quote_resolver::QuoteResolver;
use watchlist_backend::models::{PricePoint, Quote, Watchlist};
use watchlist_backend::state::AppState;

/// Answers for a fixed set of quotes and misses everything else.
struct TableProvider(Vec<Quote>);

#[async_trait]
impl QuoteProvider for TableProvider {
    fn name(&self) -> &'static str {
        "table"
    }

    async fn fetch_quotes(&self, symbols: &[String]) -> ProviderResult {
        Ok(symbols
            .iter()
            .filter_map(|s| self.0.iter().find(|q| &q.symbol == s).cloned())
            .collect())
    }
}

struct DownProvider;

#[async_trait]
impl QuoteProvider for DownProvider {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn fetch_quotes(&self, _symbols: &[String]) -> ProviderResult {
        Err(PriceProviderError::Network("connection reset".into()))
    }
}

struct NoHistory;

#[async_trait]
impl HistoryProvider for NoHistory {
    async fn fetch_history(&self, _symbol: &str) -> Result<Vec<PricePoint>, PriceProviderError> {
        Err(PriceProviderError::NotConfigured("FMP_API_KEY not set".into()))
    }
}

fn ibm() -> Quote {
    Quote::new("IBM", "International Business Machines", 180.0, 1.5, 0.84)
}

fn app_with(providers: Vec<Box<dyn QuoteProvider>>, watchlist: Watchlist) -> Router {
    let state = AppState::new(QuoteResolver::new(providers), Arc::new(NoHistory), watchlist);
    create_app(state)
}

fn default_app() -> Router {
    let seeded = Watchlist::from_quotes(vec![
        Quote::new("AAPL", "Apple Inc.", 175.43, 2.15, 1.24),
        Quote::new("TSLA", "Tesla, Inc.", 248.50, -3.25, -1.29),
    ]);
    app_with(
        vec![Box::new(DownProvider), Box::new(TableProvider(vec![ibm()]))],
        seeded,
    )
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = default_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_quotes_fall_back_and_drop_unknown() {
    let app = app_with(vec![Box::new(DownProvider)], Watchlist::new());

    let (status, body) = send(&app, Method::GET, "/api/quotes?symbols=AAPL,ZZZZ", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "symbol": "AAPL", "name": "Apple Inc.", "price": 175.43, "change": 2.15, "changePercent": 1.24 }])
    );
}

#[tokio::test]
async fn test_quotes_without_symbols_is_empty() {
    let app = default_app();

    let (status, body) = send(&app, Method::GET, "/api/quotes", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_search_echoes_sequence() {
    let app = default_app();

    let (_, body) = send(&app, Method::GET, "/api/search?q=aapl&seq=7", None).await;

    assert_eq!(body["seq"], 7);
    assert_eq!(body["results"], json!([{ "symbol": "AAPL", "name": "Apple Inc." }]));
}

#[tokio::test]
async fn test_search_offers_direct_add() {
    let app = default_app();

    let (_, body) = send(&app, Method::GET, "/api/search?q=ibm", None).await;

    assert_eq!(body["results"], json!([{ "symbol": "IBM", "name": "Add IBM directly" }]));
    assert_eq!(body["seq"], Value::Null);
}

#[tokio::test]
async fn test_add_list_and_remove() {
    let app = default_app();

    let (status, body) = send(&app, Method::POST, "/api/watchlist", Some(json!({ "symbol": "ibm" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body[0]["symbol"], "IBM");

    let (_, body) = send(&app, Method::GET, "/api/watchlist", None).await;
    let listed: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["symbol"].as_str().unwrap())
        .collect();
    assert_eq!(listed, vec!["AAPL", "TSLA", "IBM"]);

    let (_, body) = send(&app, Method::GET, "/api/watchlist?filter=business", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, "/api/watchlist/IBM", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, "/api/watchlist/IBM", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_duplicate_conflicts() {
    let app = default_app();

    let (status, body) = send(&app, Method::POST, "/api/watchlist", Some(json!({ "symbol": "AAPL" }))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "AAPL is already in your watchlist");
}

#[tokio::test]
async fn test_add_unknown_symbol_is_not_found() {
    let app = default_app();

    let (status, body) = send(&app, Method::POST, "/api/watchlist", Some(json!({ "symbol": "ZZZZ" }))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Failed to get data for ZZZZ"));
}

#[tokio::test]
async fn test_malformed_symbols_are_bad_requests() {
    let app = default_app();

    let (status, body) = send(&app, Method::POST, "/api/watchlist", Some(json!({ "symbol": "x/../../evil" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not a valid ticker symbol"));

    let (status, _) = send(&app, Method::GET, "/api/quotes?symbols=AAPL,x%2F..%2Fevil", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/sparkline/not%20a%20ticker", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/api/watchlist", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_quotes_over_the_cap_are_rejected() {
    let app = default_app();
    let many: Vec<String> = (0..26).map(|i| format!("S{}", i)).collect();

    let (status, _) = send(&app, Method::GET, &format!("/api/quotes?symbols={}", many.join(",")), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_keeps_order() {
    let app = default_app();

    let (status, body) = send(&app, Method::POST, "/api/watchlist/refresh", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["symbol"], "AAPL");
    assert_eq!(body[1]["symbol"], "TSLA");
}

#[tokio::test]
async fn test_sparkline_follows_tracked_trend() {
    let app = default_app();

    let (status, body) = send(&app, Method::GET, "/api/sparkline/TSLA", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["positive"], false);
    assert_eq!(body["stroke"], "#d93025");
    assert_eq!(body["synthetic"], true);
    assert_eq!(body["points"]["points"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_sparkline_explicit_trend_wins() {
    let app = default_app();

    let (_, body) = send(&app, Method::GET, "/api/sparkline/TSLA?positive=true", None).await;

    assert_eq!(body["positive"], true);
    assert!(body["area_path"].as_str().unwrap().ends_with("L 200,50 L 0,50 Z"));
}
