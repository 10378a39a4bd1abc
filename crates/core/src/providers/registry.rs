use super::mock_market::MockMarketProvider;
use super::traits::AssetLookupProvider;

/// Ordered list of lookup providers.
///
/// Earlier registrations have priority; later ones serve as fallbacks when
/// an earlier provider fails.
pub struct LookupProviderRegistry {
    providers: Vec<Box<dyn AssetLookupProvider>>,
}

impl LookupProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the built-in mock market.
    pub fn new_with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MockMarketProvider::new()));
        registry
    }

    /// Register a new provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn AssetLookupProvider>) {
        self.providers.push(provider);
    }

    /// All providers, in priority order.
    pub fn providers(&self) -> Vec<&dyn AssetLookupProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for LookupProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
