use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::config::ProviderConfig;
use crate::external::{endpoint, http_client};
use crate::external::price_provider::{PriceProviderError, ProviderResult, QuoteProvider};
use crate::external::reference_data::display_name;
use crate::models::Quote;

/// Alpha Vantage GLOBAL_QUOTE. One symbol per call and a tight daily quota,
/// so it sits last in the chain.
pub struct AlphaVantageProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AlphaVantageProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: http_client(config),
            base_url: config.alphavantage_base_url.trim_end_matches('/').to_string(),
            api_key: config.alphavantage_api_key.clone(),
        }
    }

    async fn fetch_one(&self, symbol: &str, api_key: &str) -> Result<Quote, PriceProviderError> {
        let url = endpoint(&self.base_url, &["query"])?;

        let resp = self
            .client
            .get(url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", api_key),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", resp.status())));
        }

        let body = resp
            .json::<AvGlobalQuoteResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        // Throttled responses come back as 200 with a "Note" or "Information" field
        if body.note.is_some() || body.information.is_some() {
            return Err(PriceProviderError::RateLimited);
        }

        if let Some(msg) = body.error_message {
            return Err(PriceProviderError::BadResponse(msg));
        }

        // Unknown symbols yield an empty "Global Quote" object
        let quote = body
            .global_quote
            .filter(|q| q.symbol.as_deref().is_some_and(|s| !s.is_empty()))
            .ok_or(PriceProviderError::NotFound)?;

        quote.into_quote()
    }
}

#[derive(Debug, Deserialize)]
struct AvGlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<AvGlobalQuote>,

    #[serde(rename = "Note")]
    note: Option<String>,

    #[serde(rename = "Information")]
    information: Option<String>,

    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AvGlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,

    #[serde(rename = "05. price")]
    price: Option<String>,

    #[serde(rename = "09. change")]
    change: Option<String>,

    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

impl AvGlobalQuote {
    fn into_quote(self) -> Result<Quote, PriceProviderError> {
        let symbol = self
            .symbol
            .ok_or_else(|| PriceProviderError::BadResponse("missing symbol".into()))?;

        let price = parse_number("05. price", self.price.as_deref())?;
        let change = parse_number("09. change", self.change.as_deref())?;
        let change_percent = parse_number(
            "10. change percent",
            self.change_percent.as_deref().map(|p| p.trim_end_matches('%')),
        )?;

        let name = display_name(&symbol, None);
        Ok(Quote::new(symbol, name, price, change, change_percent))
    }
}

// Alpha Vantage sends every number as a string
fn parse_number(field: &str, raw: Option<&str>) -> Result<f64, PriceProviderError> {
    let raw = raw.ok_or_else(|| PriceProviderError::BadResponse(format!("missing {}", field)))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|e| PriceProviderError::Parse(format!("{}: {}", field, e)))
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn name(&self) -> &'static str {
        "Alpha Vantage"
    }

    async fn fetch_quotes(&self, symbols: &[String]) -> ProviderResult {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PriceProviderError::NotConfigured("ALPHAVANTAGE_API_KEY not set".into()))?;

        // Sequential: the free tier allows five calls a minute.
        let mut quotes = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.fetch_one(symbol, api_key).await {
                Ok(quote) => quotes.push(quote),
                Err(PriceProviderError::RateLimited) => {
                    warn!("Alpha Vantage throttled at {}; skipping the rest of the batch", symbol);
                    break;
                }
                Err(e) => warn!("Failed to fetch {} from Alpha Vantage: {}", symbol, e),
            }
        }

        Ok(quotes)
    }
}
