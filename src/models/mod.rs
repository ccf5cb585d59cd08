mod price_point;
mod quote;
pub mod watchlist;

pub use price_point::PricePoint;
pub use quote::{normalize_symbol, round2, Quote};
pub use watchlist::{AddWatchlistItemRequest, Watchlist, WatchlistError, WatchlistFilterParams};
