pub(crate) mod health;
pub(crate) mod quotes;
pub(crate) mod search;
pub(crate) mod sparkline;
pub(crate) mod watchlists;
