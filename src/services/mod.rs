pub mod sparkline;
pub mod symbol_search;
pub mod watchlist_service;
