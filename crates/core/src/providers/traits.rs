use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::lookup::{LookupResult, PriceQuote};

/// Trait abstraction for asset search / quote sources.
///
/// The core never talks to a market directly: it only sees this trait, so a
/// real data source can replace the built-in mock without touching services.
#[async_trait]
pub trait AssetLookupProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Find assets whose ticker or name matches `query`.
    ///
    /// When called through `LookupService`, `query` is already trimmed and at
    /// least the configured minimum length.
    async fn search(&self, query: &str) -> Result<Vec<LookupResult>, CoreError>;

    /// Latest prices for the given tickers.
    /// Tickers the provider does not know are left out of the result.
    async fn current_prices(&self, tickers: &[String]) -> Result<Vec<PriceQuote>, CoreError>;
}
