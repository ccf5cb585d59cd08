use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::external::{endpoint, http_client};
use crate::external::price_provider::{PriceProviderError, ProviderResult, QuoteProvider};
use crate::external::reference_data::display_name;
use crate::models::Quote;

/// Chart requests in flight at once.
const MAX_IN_FLIGHT: usize = 4;

/// Yahoo Finance chart API. Free and keyless, but only answers one symbol per
/// request and reports price plus previous close, so change figures are
/// derived here.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: http_client(config),
            base_url: config.yahoo_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_one(&self, symbol: &str) -> Result<Quote, PriceProviderError> {
        let url = endpoint(&self.base_url, &["v8", "finance", "chart", symbol])?;

        let resp = self
            .client
            .get(url)
            .query(&[("interval", "1d"), ("range", "1d")])
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PriceProviderError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", resp.status())));
        }

        let body: YahooChartResponse = resp.json().await?;

        if let Some(error) = body.chart.error {
            return Err(PriceProviderError::BadResponse(error.description));
        }

        let meta = body
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
            .map(|r| r.meta)
            .ok_or(PriceProviderError::NotFound)?;

        let price = meta
            .regular_market_price
            .ok_or_else(|| PriceProviderError::BadResponse("missing regularMarketPrice".into()))?;
        let previous_close = meta
            .previous_close
            .or(meta.chart_previous_close)
            .ok_or_else(|| PriceProviderError::BadResponse("missing previous close".into()))?;

        let name = display_name(symbol, meta.long_name.as_deref().or(meta.short_name.as_deref()));

        Quote::from_previous_close(symbol, name, price, previous_close)
            .ok_or_else(|| PriceProviderError::BadResponse("previous close is zero".into()))
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    long_name: Option<String>,
    short_name: Option<String>,
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &'static str {
        "Yahoo Finance"
    }

    async fn fetch_quotes(&self, symbols: &[String]) -> ProviderResult {
        // One request per symbol, a few at a time; `buffered` keeps input order.
        let requests: Vec<_> = symbols.iter().map(|s| self.fetch_one(s)).collect();
        let attempts: Vec<_> = stream::iter(requests)
            .buffered(MAX_IN_FLIGHT)
            .collect()
            .await;

        let mut quotes = Vec::with_capacity(symbols.len());
        for (symbol, attempt) in symbols.iter().zip(attempts) {
            match attempt {
                Ok(quote) => {
                    debug!("Yahoo Finance returned {} at {}", symbol, quote.price);
                    quotes.push(quote);
                }
                Err(e) => warn!("Failed to fetch {} from Yahoo Finance: {}", symbol, e),
            }
        }

        Ok(quotes)
    }
}
