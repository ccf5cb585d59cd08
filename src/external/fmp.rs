use async_trait::async_trait;
use chrono::{Months, NaiveDate, Utc};
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::external::{endpoint, http_client};
use crate::external::price_provider::{HistoryProvider, PriceProviderError, ProviderResult, QuoteProvider};
use crate::models::{round2, PricePoint, Quote};

/// Keep one bar out of this many when thinning a daily series for a sparkline.
const HISTORY_STRIDE: usize = 7;

/// Financial Modeling Prep. Batch quote endpoint (one request for all
/// symbols) and the daily history used by sparklines.
pub struct FmpProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl FmpProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: http_client(config),
            base_url: config.fmp_base_url.trim_end_matches('/').to_string(),
            api_key: config.fmp_api_key.clone(),
        }
    }

    fn api_key(&self) -> Result<&str, PriceProviderError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| PriceProviderError::NotConfigured("FMP_API_KEY not set".into()))
    }

    async fn get(&self, segments: &[&str]) -> Result<reqwest::Response, PriceProviderError> {
        let api_key = self.api_key()?;
        let url = endpoint(&self.base_url, segments)?;

        let resp = self
            .client
            .get(url)
            .query(&[("apikey", api_key)])
            .send()
            .await?;

        match resp.status() {
            s if s == reqwest::StatusCode::TOO_MANY_REQUESTS => Err(PriceProviderError::RateLimited),
            s if s.is_success() => Ok(resp),
            s => {
                // FMP explains auth and plan failures in the body
                let detail = resp
                    .json::<FmpErrorBody>()
                    .await
                    .map(|b| b.error_message)
                    .unwrap_or_else(|_| format!("HTTP {}", s));
                Err(PriceProviderError::BadResponse(detail))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FmpQuoteResponse {
    Quotes(Vec<FmpQuote>),
    Error(FmpErrorBody),
}

#[derive(Debug, Deserialize)]
struct FmpErrorBody {
    #[serde(rename = "Error Message")]
    error_message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpQuote {
    symbol: Option<String>,
    name: Option<String>,
    price: Option<f64>,
    change: Option<f64>,
    changes_percentage: Option<f64>,
}

impl FmpQuote {
    /// All numeric fields are required; a partial row is dropped.
    fn into_quote(self) -> Option<Quote> {
        let symbol = self.symbol.filter(|s| !s.is_empty())?;
        let name = self.name.unwrap_or_else(|| symbol.clone());
        Some(Quote::new(symbol, name, self.price?, self.change?, self.changes_percentage?))
    }
}

#[derive(Debug, Deserialize)]
struct FmpHistoryResponse {
    #[serde(default)]
    historical: Vec<FmpHistoricalBar>,
}

#[derive(Debug, Deserialize)]
struct FmpHistoricalBar {
    date: String,
    close: f64,
}

/// Trims a daily series to bars on or after `since`, orders it oldest-first
/// and keeps every seventh bar.
fn thin_history(bars: Vec<FmpHistoricalBar>, since: NaiveDate) -> Vec<PricePoint> {
    let mut dated: Vec<(NaiveDate, FmpHistoricalBar)> = bars
        .into_iter()
        .filter_map(|bar| {
            let date = NaiveDate::parse_from_str(&bar.date, "%Y-%m-%d").ok()?;
            (date >= since && bar.close.is_finite()).then_some((date, bar))
        })
        .collect();

    dated.sort_by_key(|(date, _)| *date);

    dated
        .into_iter()
        .step_by(HISTORY_STRIDE)
        .map(|(_, bar)| PricePoint::dated(bar.date, round2(bar.close)))
        .collect()
}

#[async_trait]
impl QuoteProvider for FmpProvider {
    fn name(&self) -> &'static str {
        "Financial Modeling Prep"
    }

    async fn fetch_quotes(&self, symbols: &[String]) -> ProviderResult {
        let joined = symbols.join(",");
        let resp = self.get(&["quote", joined.as_str()]).await?;

        let body = resp
            .json::<FmpQuoteResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        match body {
            FmpQuoteResponse::Quotes(rows) => Ok(rows.into_iter().filter_map(FmpQuote::into_quote).collect()),
            FmpQuoteResponse::Error(err) => Err(PriceProviderError::BadResponse(err.error_message)),
        }
    }
}

#[async_trait]
impl HistoryProvider for FmpProvider {
    async fn fetch_history(&self, symbol: &str) -> Result<Vec<PricePoint>, PriceProviderError> {
        let resp = self.get(&["historical-price-full", symbol]).await?;

        let body = resp
            .json::<FmpHistoryResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        let today = Utc::now().date_naive();
        let since = today
            .checked_sub_months(Months::new(12))
            .unwrap_or(today);

        Ok(thin_history(body.historical, since))
    }
}
