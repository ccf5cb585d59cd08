use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::ProviderConfig;
use crate::external::fmp::FmpProvider;
use crate::external::price_provider::HistoryProvider;
use crate::external::quote_resolver::QuoteResolver;
use crate::models::Watchlist;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<QuoteResolver>,
    pub history: Arc<dyn HistoryProvider>,
    pub watchlist: Arc<RwLock<Watchlist>>,
}

impl AppState {
    pub fn new(resolver: QuoteResolver, history: Arc<dyn HistoryProvider>, watchlist: Watchlist) -> Self {
        Self {
            resolver: Arc::new(resolver),
            history,
            watchlist: Arc::new(RwLock::new(watchlist)),
        }
    }

    pub fn from_config(config: &ProviderConfig, watchlist: Watchlist) -> Self {
        Self::new(
            QuoteResolver::from_config(config),
            Arc::new(FmpProvider::new(config)),
            watchlist,
        )
    }
}
