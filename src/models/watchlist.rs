use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MAX_SYMBOLS;
use crate::models::Quote;

// ==============================================================================
// Watchlist
// ==============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum WatchlistError {
    #[error("{0} is already in your watchlist")]
    Duplicate(String),

    #[error("{0} is not in your watchlist")]
    NotFound(String),

    #[error("watchlist is full ({0} symbols)")]
    Full(usize),
}

/// The user's tracked quotes, unique by symbol, kept in insertion order and
/// never longer than `MAX_SYMBOLS`.
#[derive(Debug, Clone, Default)]
pub struct Watchlist {
    quotes: Vec<Quote>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a watchlist from a resolved batch, skipping repeated symbols.
    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        let mut list = Self::new();
        for quote in quotes {
            if list.is_full() {
                break;
            }
            if !list.contains(&quote.symbol) {
                list.quotes.push(quote);
            }
        }
        list
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.quotes.iter().any(|q| q.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn get(&self, symbol: &str) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn symbols(&self) -> Vec<String> {
        self.quotes.iter().map(|q| q.symbol.clone()).collect()
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.quotes.len() >= MAX_SYMBOLS
    }

    /// Appends freshly resolved quotes. Nothing is added if any of them is
    /// already tracked.
    pub fn add(&mut self, quotes: Vec<Quote>) -> Result<(), WatchlistError> {
        if let Some(dup) = quotes.iter().find(|q| self.contains(&q.symbol)) {
            return Err(WatchlistError::Duplicate(dup.symbol.clone()));
        }
        if self.quotes.len() + quotes.len() > MAX_SYMBOLS {
            return Err(WatchlistError::Full(MAX_SYMBOLS));
        }
        for quote in quotes {
            if !self.contains(&quote.symbol) {
                self.quotes.push(quote);
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, symbol: &str) -> Result<Quote, WatchlistError> {
        let idx = self
            .quotes
            .iter()
            .position(|q| q.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| WatchlistError::NotFound(symbol.to_uppercase()))?;
        Ok(self.quotes.remove(idx))
    }

    /// Replaces each tracked quote with its fresh counterpart. Symbols that
    /// came back without data keep their previous quote.
    pub fn apply_refresh(&mut self, fresh: Vec<Quote>) -> usize {
        let mut updated = 0;
        for current in self.quotes.iter_mut() {
            if let Some(newer) = fresh.iter().find(|q| q.symbol.eq_ignore_ascii_case(&current.symbol)) {
                *current = newer.clone();
                updated += 1;
            }
        }
        updated
    }

    pub fn filter(&self, query: &str) -> Vec<Quote> {
        let query = query.trim();
        if query.is_empty() {
            return self.quotes.clone();
        }
        self.quotes.iter().filter(|q| q.matches(query)).cloned().collect()
    }
}

// ==============================================================================
// Request / Response Models
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddWatchlistItemRequest {
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistFilterParams {
    pub filter: Option<String>,
}
