use tokio::net::TcpListener;

use watchlist_backend::app;
use watchlist_backend::config::{AppConfig, DEFAULT_SYMBOLS};
use watchlist_backend::logging::{init_logging, LoggingConfig};
use watchlist_backend::services::watchlist_service;
use watchlist_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;

    if config.providers.fmp_api_key.is_none() {
        tracing::warn!("FMP_API_KEY not set: batch quotes skipped, sparklines fall back to placeholder trends");
    }
    if config.providers.alphavantage_api_key.is_none() {
        tracing::warn!("ALPHAVANTAGE_API_KEY not set: Alpha Vantage fallback disabled");
    }

    let state = AppState::from_config(&config.providers, Default::default());
    tracing::info!("📊 Quote providers: {:?}", state.resolver.provider_names());

    let watchlist = watchlist_service::load_default(&state.resolver, DEFAULT_SYMBOLS).await;
    *state.watchlist.write() = watchlist;

    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Watchlist backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
