use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::price_provider::{HistoryProvider, PriceProviderError};
use crate::external::quote_resolver::QuoteResolver;
use crate::config::MAX_SYMBOLS;
use crate::models::{normalize_symbol, Quote, Watchlist};
use crate::services::sparkline::{self, PathSpec};

/// Resolves the startup symbols into a fresh watchlist.
pub async fn load_default(resolver: &QuoteResolver, symbols: &[&str]) -> Watchlist {
    let symbols: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
    let quotes = resolver.resolve_quotes(&symbols).await;
    info!("📋 Loaded {} of {} default symbols", quotes.len(), symbols.len());
    Watchlist::from_quotes(quotes)
}

pub async fn add_symbol(
    resolver: &QuoteResolver,
    watchlist: &RwLock<Watchlist>,
    symbol: &str,
) -> Result<Vec<Quote>, AppError> {
    if symbol.trim().is_empty() {
        return Err(AppError::Validation("symbol must not be empty".into()));
    }
    let symbol = normalize_symbol(symbol)
        .ok_or_else(|| AppError::Validation(format!("{:?} is not a valid ticker symbol", symbol.trim())))?;

    // Cheap checks before spending provider quota; re-checked under the write lock.
    {
        let current = watchlist.read();
        if current.contains(&symbol) {
            return Err(AppError::Duplicate(format!("{} is already in your watchlist", symbol)));
        }
        if current.is_full() {
            return Err(AppError::Validation(format!("watchlist is full ({} symbols)", MAX_SYMBOLS)));
        }
    }

    let quotes = resolver.resolve_quotes(&[symbol.clone()]).await;
    if quotes.is_empty() {
        warn!("No data for {} from any provider", symbol);
        return Err(AppError::NotFound(format!(
            "Failed to get data for {}. Please check the symbol and try again.",
            symbol
        )));
    }

    watchlist.write().add(quotes.clone())?;
    info!("✅ Added {} to watchlist", symbol);
    Ok(quotes)
}

pub fn remove_symbol(watchlist: &RwLock<Watchlist>, symbol: &str) -> Result<Quote, AppError> {
    let removed = watchlist.write().remove(symbol.trim())?;
    info!("🗑️ Removed {} from watchlist", removed.symbol);
    Ok(removed)
}

/// Re-resolves every tracked symbol. The lock is not held while providers
/// are queried.
pub async fn refresh(resolver: &QuoteResolver, watchlist: &RwLock<Watchlist>) -> Vec<Quote> {
    let symbols = watchlist.read().symbols();
    if symbols.is_empty() {
        return Vec::new();
    }

    let fresh = resolver.resolve_quotes(&symbols).await;

    let mut guard = watchlist.write();
    let updated = guard.apply_refresh(fresh);
    info!("🔄 Refreshed {}/{} watchlist quotes", updated, symbols.len());
    guard.quotes().to_vec()
}

#[derive(Debug, Clone, Serialize)]
pub struct SparklineResponse {
    pub symbol: String,
    pub positive: bool,
    pub stroke: &'static str,
    pub path: String,
    pub area_path: String,
    pub points: PathSpec,
    pub synthetic: bool,
}

/// Fetches history for `symbol` and draws its sparkline. Missing history
/// is not an error; the generator draws a placeholder trend.
pub async fn sparkline_for(
    history: &dyn HistoryProvider,
    symbol: &str,
    trend_is_positive: bool,
) -> SparklineResponse {
    let symbol = symbol.trim().to_uppercase();

    let series = match history.fetch_history(&symbol).await {
        Ok(series) => series,
        Err(PriceProviderError::NotConfigured(reason)) => {
            warn!("History provider misconfigured ({}); drawing placeholder for {}", reason, symbol);
            Vec::new()
        }
        Err(e) => {
            warn!("History unavailable for {}: {}", symbol, e);
            Vec::new()
        }
    };

    let outline = sparkline::build_path(&series, trend_is_positive);

    SparklineResponse {
        symbol,
        positive: trend_is_positive,
        stroke: sparkline::stroke_color(trend_is_positive),
        path: outline.to_svg_path(),
        area_path: outline.to_area_path(),
        points: outline,
        synthetic: series.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::price_provider::{ProviderResult, QuoteProvider};
    use crate::models::PricePoint;
    use async_trait::async_trait;

    struct StaticProvider(Vec<Quote>);

    #[async_trait]
    impl QuoteProvider for StaticProvider {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch_quotes(&self, symbols: &[String]) -> ProviderResult {
            Ok(self
                .0
                .iter()
                .filter(|q| symbols.contains(&q.symbol))
                .cloned()
                .collect())
        }
    }

    struct StaticHistory(Result<Vec<PricePoint>, ()>);

    #[async_trait]
    impl HistoryProvider for StaticHistory {
        async fn fetch_history(&self, _symbol: &str) -> Result<Vec<PricePoint>, PriceProviderError> {
            self.0
                .clone()
                .map_err(|_| PriceProviderError::NotConfigured("FMP_API_KEY not set".into()))
        }
    }

    fn resolver_with(quotes: Vec<Quote>) -> QuoteResolver {
        QuoteResolver::new(vec![Box::new(StaticProvider(quotes))])
    }

    #[tokio::test]
    async fn test_add_symbol_normalizes_and_appends() {
        let resolver = resolver_with(vec![Quote::new("IBM", "IBM", 180.0, 1.0, 0.56)]);
        let watchlist = RwLock::new(Watchlist::new());

        let added = add_symbol(&resolver, &watchlist, " ibm ").await.unwrap();

        assert_eq!(added[0].symbol, "IBM");
        assert!(watchlist.read().contains("IBM"));
    }

    #[tokio::test]
    async fn test_add_duplicate_is_conflict() {
        let ibm = Quote::new("IBM", "IBM", 180.0, 1.0, 0.56);
        let resolver = resolver_with(vec![ibm.clone()]);
        let watchlist = RwLock::new(Watchlist::from_quotes(vec![ibm]));

        let err = add_symbol(&resolver, &watchlist, "IBM").await.unwrap_err();

        assert!(matches!(err, AppError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_add_unknown_symbol_is_not_found() {
        let resolver = resolver_with(vec![]);
        let watchlist = RwLock::new(Watchlist::new());

        let err = add_symbol(&resolver, &watchlist, "ZZZZ").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(watchlist.read().is_empty());
    }

    #[tokio::test]
    async fn test_add_blank_symbol_is_rejected() {
        let resolver = resolver_with(vec![]);
        let watchlist = RwLock::new(Watchlist::new());

        let err = add_symbol(&resolver, &watchlist, "  ").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_malformed_symbol_is_rejected() {
        let resolver = resolver_with(vec![Quote::new("EVIL", "EVIL", 1.0, 0.0, 0.0)]);
        let watchlist = RwLock::new(Watchlist::new());

        let err = add_symbol(&resolver, &watchlist, "x/../../evil").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(watchlist.read().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_full_watchlist_is_rejected() {
        let resolver = resolver_with(vec![Quote::new("IBM", "IBM", 180.0, 1.0, 0.56)]);
        let full: Vec<Quote> = (0..MAX_SYMBOLS)
            .map(|i| Quote::new(format!("S{}", i), "S", 1.0, 0.0, 0.0))
            .collect();
        let watchlist = RwLock::new(Watchlist::from_quotes(full));

        let err = add_symbol(&resolver, &watchlist, "IBM").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("full")));
        assert!(!watchlist.read().contains("IBM"));
    }

    #[tokio::test]
    async fn test_refresh_updates_known_quotes() {
        let resolver = resolver_with(vec![Quote::new("IBM", "IBM", 200.0, 2.0, 1.01)]);
        let watchlist = RwLock::new(Watchlist::from_quotes(vec![
            Quote::new("IBM", "IBM", 180.0, 1.0, 0.56),
            Quote::new("ZZZZ", "ZZZZ", 1.0, 0.0, 0.0),
        ]));

        let quotes = refresh(&resolver, &watchlist).await;

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].price, 200.0);
        assert_eq!(quotes[1].symbol, "ZZZZ");
    }

    #[tokio::test]
    async fn test_load_default_uses_fallback_when_providers_miss() {
        let resolver = resolver_with(vec![]);

        let watchlist = load_default(&resolver, &["AAPL", "MSFT"]).await;

        assert_eq!(watchlist.symbols(), vec!["AAPL", "MSFT"]);
    }

    #[tokio::test]
    async fn test_sparkline_without_history_is_synthetic() {
        let history = StaticHistory(Err(()));

        let response = sparkline_for(&history, "aapl", true).await;

        assert_eq!(response.symbol, "AAPL");
        assert!(response.synthetic);
        assert_eq!(response.points.len(), 20);
        assert_eq!(response.stroke, "#137333");
        assert!(response.path.starts_with("M 0,"));
    }

    #[tokio::test]
    async fn test_sparkline_with_history() {
        let history = StaticHistory(Ok(vec![PricePoint::new(10.0), PricePoint::new(20.0)]));

        let response = sparkline_for(&history, "AAPL", false).await;

        assert!(!response.synthetic);
        assert_eq!(response.path, "M 0,45 L 200,5");
        assert_eq!(response.stroke, "#d93025");
    }
}
