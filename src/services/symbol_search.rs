use serde::{Deserialize, Serialize};

const MAX_RESULTS: usize = 10;

// (search key, symbol, name). Order is the substring-match order.
const COMMON_STOCKS: &[(&str, &str, &str)] = &[
    ("aapl", "AAPL", "Apple Inc."),
    ("googl", "GOOGL", "Alphabet Inc."),
    ("msft", "MSFT", "Microsoft Corporation"),
    ("tsla", "TSLA", "Tesla, Inc."),
    ("amzn", "AMZN", "Amazon.com, Inc."),
    ("nvda", "NVDA", "NVIDIA Corporation"),
    ("meta", "META", "Meta Platforms, Inc."),
    ("nflx", "NFLX", "Netflix, Inc."),
    ("amd", "AMD", "Advanced Micro Devices, Inc."),
    ("intc", "INTC", "Intel Corporation"),
    ("orcl", "ORCL", "Oracle Corporation"),
    ("adbe", "ADBE", "Adobe Inc."),
    ("crm", "CRM", "Salesforce, Inc."),
    ("pypl", "PYPL", "PayPal Holdings, Inc."),
    ("uber", "UBER", "Uber Technologies, Inc."),
    ("lyft", "LYFT", "Lyft, Inc."),
    ("zoom", "ZM", "Zoom Video Communications, Inc."),
    ("shop", "SHOP", "Shopify Inc."),
    ("sq", "SQ", "Block, Inc."),
    ("twtr", "TWTR", "Twitter, Inc."),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
}

impl SymbolMatch {
    fn from_entry(&(_, symbol, name): &(&str, &str, &str)) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }
}

/// Looks `query` up in the local ticker table. An exact key match comes
/// first, then every other key containing the query, capped at ten.
pub fn search_symbols(query: &str) -> Vec<SymbolMatch> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    matches_in(COMMON_STOCKS, &query)
}

fn matches_in(table: &[(&str, &str, &str)], query: &str) -> Vec<SymbolMatch> {
    let exact = table.iter().filter(|(key, ..)| *key == query);
    let partial = table
        .iter()
        .filter(|(key, ..)| *key != query && key.contains(query));

    exact
        .chain(partial)
        .take(MAX_RESULTS)
        .map(SymbolMatch::from_entry)
        .collect()
}
