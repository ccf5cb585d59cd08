use tracing::{info, warn};

use crate::config::ProviderConfig;
use crate::external::alphavantage::AlphaVantageProvider;
use crate::external::fmp::FmpProvider;
use crate::external::price_provider::QuoteProvider;
use crate::external::reference_data::fallback_quotes;
use crate::external::yahoofinance::YahooFinanceProvider;
use crate::models::{normalize_symbol, Quote};

/// QuoteResolver walks a fixed-order list of providers and returns the first
/// non-empty answer.
///
/// Strategy:
/// 1. Yahoo Finance (keyless, per-symbol)
/// 2. Financial Modeling Prep (batch)
/// 3. Alpha Vantage (per-symbol, strict daily quota)
/// 4. If every provider misses, the static last-known-good table
///
/// Results are never merged across providers. Resolution cannot fail; the
/// worst case is an empty list.
pub struct QuoteResolver {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteResolver {
    pub fn new(providers: Vec<Box<dyn QuoteProvider>>) -> Self {
        Self { providers }
    }

    /// The production chain, built from injected configuration.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(vec![
            Box::new(YahooFinanceProvider::new(config)),
            Box::new(FmpProvider::new(config)),
            Box::new(AlphaVantageProvider::new(config)),
        ])
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn resolve_quotes(&self, symbols: &[String]) -> Vec<Quote> {
        let symbols = normalize_symbols(symbols);
        if symbols.is_empty() {
            return Vec::new();
        }

        for provider in &self.providers {
            match provider.fetch_quotes(&symbols).await {
                Ok(quotes) => {
                    let quotes = retain_usable(provider.name(), &symbols, quotes);
                    if !quotes.is_empty() {
                        info!(
                            "✓ Resolved {}/{} symbols from {}",
                            quotes.len(),
                            symbols.len(),
                            provider.name()
                        );
                        return quotes;
                    }
                    info!("{} returned no quotes for {:?}, trying next provider", provider.name(), symbols);
                }
                Err(e) => {
                    warn!("{} failed for {:?}: {}. Trying next provider.", provider.name(), symbols, e);
                }
            }
        }

        let quotes = fallback_quotes(&symbols);
        warn!(
            "All providers failed for {:?}; serving {} fallback quotes",
            symbols,
            quotes.len()
        );
        quotes
    }
}

/// Trims and upper-cases symbols, dropping blanks, repeats and anything that
/// is not a ticker.
pub fn normalize_symbols(symbols: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(symbols.len());
    for raw in symbols {
        if raw.trim().is_empty() {
            continue;
        }
        match normalize_symbol(raw) {
            Some(symbol) if !normalized.contains(&symbol) => normalized.push(symbol),
            Some(_) => {}
            None => warn!("Ignoring malformed symbol {:?}", raw),
        }
    }
    normalized
}

/// Drops quotes for symbols nobody asked for and quotes breaking the `Quote`
/// invariants, then lines the rest up in request order with at most one
/// quote per symbol.
fn retain_usable(provider: &str, symbols: &[String], quotes: Vec<Quote>) -> Vec<Quote> {
    let mut usable: Vec<Quote> = Vec::with_capacity(quotes.len());
    for quote in quotes {
        if !symbols.iter().any(|s| s.eq_ignore_ascii_case(&quote.symbol)) {
            warn!("{} returned unrequested symbol {}, dropping", provider, quote.symbol);
            continue;
        }
        if !quote.is_valid() {
            warn!("{} returned inconsistent quote {:?}, dropping", provider, quote);
            continue;
        }
        usable.push(quote);
    }

    let ordered: Vec<Quote> = symbols
        .iter()
        .filter_map(|symbol| {
            let idx = usable.iter().position(|q| q.symbol.eq_ignore_ascii_case(symbol))?;
            Some(usable.swap_remove(idx))
        })
        .collect();

    if !usable.is_empty() {
        warn!("{} returned {} repeated quotes, dropping", provider, usable.len());
    }
    ordered
}
