use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::lookup::{LookupResult, PriceQuote};
use crate::providers::registry::LookupProviderRegistry;

/// Queries shorter than this return nothing without contacting a provider.
pub const MIN_QUERY_LEN: usize = 2;

/// Asset search and price quotes on top of the registered providers.
///
/// Provider failures never reach the caller of `search`: they are logged and
/// the next provider is tried, ending in an empty result.
pub struct LookupService {
    registry: LookupProviderRegistry,
    min_query_len: usize,
}

impl LookupService {
    pub fn new(registry: LookupProviderRegistry) -> Self {
        Self {
            registry,
            min_query_len: MIN_QUERY_LEN,
        }
    }

    /// Override the minimum query length (clamped to at least 1).
    pub fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len.max(1);
        self
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// Search for assets matching `query`.
    ///
    /// 1. Trimmed query shorter than the minimum → empty, no provider call.
    /// 2. First provider that answers wins.
    /// 3. All providers failing → empty.
    pub async fn search(&self, query: &str) -> Vec<LookupResult> {
        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            return Vec::new();
        }

        for provider in self.registry.providers() {
            match provider.search(query).await {
                Ok(results) => {
                    debug!("{} returned {} result(s) for '{query}'", provider.name(), results.len());
                    return results;
                }
                Err(e) => {
                    warn!("Lookup via {} failed for '{query}': {e}", provider.name());
                    // Try next provider
                }
            }
        }

        Vec::new()
    }

    /// Fetch current prices, falling back through providers in order.
    pub async fn current_prices(&self, tickers: &[String]) -> Result<Vec<PriceQuote>, CoreError> {
        if tickers.is_empty() {
            return Ok(Vec::new());
        }

        let mut last_error = None;
        for provider in self.registry.providers() {
            match provider.current_prices(tickers).await {
                Ok(quotes) => return Ok(quotes),
                Err(e) => {
                    warn!("Price refresh via {} failed: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::Lookup {
            provider: "registry".into(),
            message: "No lookup provider registered".into(),
        }))
    }
}
