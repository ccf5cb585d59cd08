//! Static tables shipped with the backend: display names for providers that
//! don't return one, and the last-known-good quotes served when every
//! provider is down.

use crate::models::Quote;

const COMPANY_NAMES: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("TSLA", "Tesla, Inc."),
    ("AMZN", "Amazon.com, Inc."),
    ("NVDA", "NVIDIA Corporation"),
];

// (symbol, name, price, change, change %)
const FALLBACK_QUOTES: &[(&str, &str, f64, f64, f64)] = &[
    ("AAPL", "Apple Inc.", 175.43, 2.15, 1.24),
    ("GOOGL", "Alphabet Inc.", 2847.52, -15.23, -0.53),
    ("MSFT", "Microsoft Corporation", 378.85, 5.42, 1.45),
    ("TSLA", "Tesla, Inc.", 248.50, -3.25, -1.29),
    ("AMZN", "Amazon.com, Inc.", 145.86, 1.23, 0.85),
    ("NVDA", "NVIDIA Corporation", 465.23, 12.45, 2.75),
];

pub fn company_name(symbol: &str) -> Option<&'static str> {
    COMPANY_NAMES
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map(|(_, name)| *name)
}

/// Display name for a symbol: the static table first, then whatever the
/// provider supplied, then the symbol itself.
pub fn display_name(symbol: &str, provider_name: Option<&str>) -> String {
    company_name(symbol)
        .map(str::to_string)
        .or_else(|| {
            provider_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| symbol.to_string())
}

/// Last-known-good quotes for the requested symbols, in request order.
/// Unknown symbols are dropped.
pub fn fallback_quotes(symbols: &[String]) -> Vec<Quote> {
    symbols
        .iter()
        .filter_map(|symbol| {
            FALLBACK_QUOTES
                .iter()
                .find(|(s, ..)| s.eq_ignore_ascii_case(symbol))
        })
        .map(|&(symbol, name, price, change, pct)| Quote::new(symbol, name, price, change, pct))
        .collect()
}
