use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
pub const DEFAULT_ALPHAVANTAGE_BASE_URL: &str = "https://www.alphavantage.co";

/// Upper bound on symbols per quote request and on watchlist size; keeps one
/// call from draining the per-symbol providers' quotas.
pub const MAX_SYMBOLS: usize = 25;

/// Symbols loaded into the watchlist at startup.
pub const DEFAULT_SYMBOLS: &[&str] = &["AAPL", "GOOGL", "MSFT", "TSLA", "AMZN", "NVDA"];

/// Endpoints and credentials for the quote providers. Injected into every
/// provider at construction so tests can point them at a mock server.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub yahoo_base_url: String,
    pub fmp_base_url: String,
    pub fmp_api_key: Option<String>,
    pub alphavantage_base_url: String,
    pub alphavantage_api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            fmp_base_url: DEFAULT_FMP_BASE_URL.to_string(),
            fmp_api_key: None,
            alphavantage_base_url: DEFAULT_ALPHAVANTAGE_BASE_URL.to_string(),
            alphavantage_api_key: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            yahoo_base_url: env_or("YAHOO_BASE_URL", defaults.yahoo_base_url),
            fmp_base_url: env_or("FMP_BASE_URL", defaults.fmp_base_url),
            fmp_api_key: env_opt("FMP_API_KEY"),
            alphavantage_base_url: env_or("ALPHAVANTAGE_BASE_URL", defaults.alphavantage_base_url),
            alphavantage_api_key: env_opt("ALPHAVANTAGE_API_KEY"),
            request_timeout: std::env::var("PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Points every provider at the same base URL. Used by tests that serve
    /// all three APIs from one mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            yahoo_base_url: base.clone(),
            fmp_base_url: base.clone(),
            fmp_api_key: Some("test".to_string()),
            alphavantage_base_url: base,
            alphavantage_api_key: Some("test".to_string()),
            request_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub providers: ProviderConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = env_or("BIND_ADDR", "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| format!("BIND_ADDR is not a valid socket address: {}", e))?;

        Ok(Self {
            bind_addr,
            providers: ProviderConfig::from_env(),
        })
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
