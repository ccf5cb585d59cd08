pub mod alphavantage;
pub mod fmp;
pub mod price_provider;
pub mod quote_resolver;
pub mod reference_data;
pub mod yahoofinance;

use reqwest::Url;

use crate::config::ProviderConfig;
use crate::external::price_provider::PriceProviderError;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; WatchlistBackend/0.1)";

/// Shared HTTP client settings for every provider.
pub(crate) fn http_client(config: &ProviderConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.request_timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Appends `segments` to the base URL's path, percent-encoding each one so a
/// symbol can never add path components or a query.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, PriceProviderError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| PriceProviderError::NotConfigured(format!("invalid base URL {}: {}", base_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| PriceProviderError::NotConfigured(format!("base URL {} cannot carry a path", base_url)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}
