use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PricePoint, Quote};

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("no data for symbol")]
    NotFound,

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for PriceProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PriceProviderError::Parse(err.to_string())
        } else {
            PriceProviderError::Network(err.to_string())
        }
    }
}

/// Outcome of one provider attempt. An empty `Ok` counts as a miss.
pub type ProviderResult = Result<Vec<Quote>, PriceProviderError>;

/// A third-party quote source. Implementations map their own JSON shape into
/// [`Quote`] and nothing else; fallback ordering lives in the resolver.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_quotes(&self, symbols: &[String]) -> ProviderResult;
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Close prices for the sparkline, oldest first.
    async fn fetch_history(&self, symbol: &str) -> Result<Vec<PricePoint>, PriceProviderError>;
}
