use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single quote row as shown in the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl Quote {
    /// Builds a quote with every numeric field rounded to cents.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        change: f64,
        change_percent: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price: round2(price),
            change: round2(change),
            change_percent: round2(change_percent),
        }
    }

    /// Builds a quote from the last price and the previous close, deriving
    /// `change` and `change_percent` locally.
    ///
    /// Returns `None` when the previous close cannot be divided by.
    pub fn from_previous_close(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        previous_close: f64,
    ) -> Option<Self> {
        if !previous_close.is_finite() || previous_close == 0.0 {
            return None;
        }
        let change = price - previous_close;
        let change_percent = change / previous_close * 100.0;
        Some(Self::new(symbol, name, price, change, change_percent))
    }

    /// `price >= 0`, all numbers finite, and `change` / `change_percent`
    /// pointing the same way (zero agrees with either sign).
    pub fn is_valid(&self) -> bool {
        let finite = self.price.is_finite()
            && self.change.is_finite()
            && self.change_percent.is_finite();

        finite
            && self.price >= 0.0
            && !self.symbol.is_empty()
            && self.change * self.change_percent >= 0.0
    }

    pub fn is_positive(&self) -> bool {
        self.change >= 0.0
    }

    /// Case-insensitive substring match on symbol or name.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.symbol.to_lowercase().contains(&query) || self.name.to_lowercase().contains(&query)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Trims and upper-cases `raw`, returning it only if it looks like an
/// exchange ticker: letters, digits and `. - ^ =`, at most ten characters.
/// Anything else never reaches a provider URL.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    static TICKER: OnceLock<Regex> = OnceLock::new();
    let ticker = TICKER.get_or_init(|| Regex::new(r"^[A-Z0-9.\-^=]{1,10}$").expect("ticker pattern compiles"));

    let symbol = raw.trim().to_uppercase();
    ticker.is_match(&symbol).then_some(symbol)
}
