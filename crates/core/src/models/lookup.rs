use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::asset::AssetClass;

/// A candidate returned by an asset search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub ticker: String,
    pub name: String,
    pub price: f64,
    pub class: AssetClass,

    /// `true` when the provider synthesized the entry instead of finding it in its catalog
    pub is_external: bool,
}

/// Latest known price for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub ticker: String,
    pub price: f64,
    pub as_of: DateTime<Utc>,
}
