use serde::{Deserialize, Serialize};

// One close in a sparkline series. Series are ordered oldest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(price: f64) -> Self {
        Self { date: None, price }
    }

    pub fn dated(date: impl Into<String>, price: f64) -> Self {
        Self {
            date: Some(date.into()),
            price,
        }
    }
}
