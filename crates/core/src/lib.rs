pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use log::{debug, info};

use config::TrackerConfig;
use errors::CoreError;
use models::{
    asset::{normalize_ticker, Asset, AssetClass},
    holdings::Holdings,
    lookup::LookupResult,
    portfolio::PortfolioSnapshot,
    settings::{AllocationSettings, AllocationValidation},
    suggestion::{SelectionSummary, SuggestionPlan},
    valuation::{AssetShare, Distribution},
};
use providers::registry::LookupProviderRegistry;
use services::{
    allocation_service::AllocationService, lookup_service::LookupService,
    portfolio_service::PortfolioService, rebalance_service::RebalanceService,
    valuation_service::ValuationService,
};
use storage::{manager::StorageManager, store::KeyValueStore};

/// Main entry point for the portfolio-rebalancer core library.
///
/// Owns one session's holdings and target allocation. Every change replaces
/// those values wholesale and re-applies the allocation rules; nothing is
/// written to storage until `save` (or one of its halves) is called.
#[must_use]
pub struct PortfolioTracker {
    holdings: Holdings,
    settings: AllocationSettings,
    plan: Option<SuggestionPlan>,
    last_price_refresh: Option<DateTime<Utc>>,
    storage: StorageManager,
    valuation_service: ValuationService,
    allocation_service: AllocationService,
    rebalance_service: RebalanceService,
    portfolio_service: PortfolioService,
    lookup_service: LookupService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("holdings", &self.holdings.len())
            .field("settings", &self.settings)
            .field("suggestions", &self.plan.as_ref().map(|p| p.suggestions.len()))
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PortfolioTracker {
    /// Create an empty portfolio with default settings and the built-in mock market.
    pub fn create_new() -> Self {
        Self::build(
            TrackerConfig::default(),
            LookupProviderRegistry::new_with_defaults(),
            Holdings::new(),
            AllocationSettings::default(),
        )
    }

    /// Create an empty portfolio with a custom configuration and provider registry.
    pub fn with_config(config: TrackerConfig, registry: LookupProviderRegistry) -> Self {
        Self::build(config, registry, Holdings::new(), AllocationSettings::default())
    }

    /// Load holdings and settings from a store using the default configuration.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, CoreError> {
        Self::load_with(
            TrackerConfig::default(),
            LookupProviderRegistry::new_with_defaults(),
            store,
        )
    }

    /// Load holdings and settings from a store.
    /// Missing blobs fall back to an empty portfolio / default settings.
    pub fn load_with(
        config: TrackerConfig,
        registry: LookupProviderRegistry,
        store: &dyn KeyValueStore,
    ) -> Result<Self, CoreError> {
        let storage = StorageManager::new(config.holdings_key.clone(), config.settings_key.clone());
        let holdings = storage.load_holdings(store)?;
        let settings = storage.load_settings(store)?;
        Ok(Self::build(config, registry, holdings, settings))
    }

    /// Persist both holdings and settings.
    ///
    /// Refused, with nothing written, while any class's weights exceed 100.
    /// Clears the unsaved-changes flag on success.
    pub fn save(&mut self, store: &mut dyn KeyValueStore) -> Result<(), CoreError> {
        self.ensure_settings_valid()?;
        self.storage.save_holdings(store, &self.holdings)?;
        self.storage.save_settings(store, &self.settings)?;
        self.dirty = false;
        info!("Saved {} holding(s) and allocation settings", self.holdings.len());
        Ok(())
    }

    /// Persist only the holdings snapshot (always allowed).
    pub fn save_holdings(&self, store: &mut dyn KeyValueStore) -> Result<(), CoreError> {
        self.storage.save_holdings(store, &self.holdings)
    }

    /// Persist only the settings, refused while weights overflow.
    pub fn save_settings(&self, store: &mut dyn KeyValueStore) -> Result<(), CoreError> {
        self.ensure_settings_valid()?;
        self.storage.save_settings(store, &self.settings)
    }

    // ── Holdings & Value ────────────────────────────────────────────

    #[must_use]
    pub fn holdings(&self) -> &Holdings {
        &self.holdings
    }

    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.valuation_service.total_value(&self.holdings)
    }

    #[must_use]
    pub fn class_value(&self, class: AssetClass) -> f64 {
        self.valuation_service.class_value(&self.holdings, class)
    }

    #[must_use]
    pub fn distribution(&self) -> Distribution {
        self.valuation_service.distribution(&self.holdings)
    }

    /// All holdings with their value and share of the portfolio.
    #[must_use]
    pub fn asset_shares(&self) -> Vec<AssetShare> {
        self.valuation_service.with_percentages(&self.holdings)
    }

    /// Holdings of one class with their share of the whole portfolio.
    #[must_use]
    pub fn class_shares(&self, class: AssetClass) -> Vec<AssetShare> {
        self.valuation_service.class_shares(&self.holdings, class)
    }

    // ── Portfolio Mutation ──────────────────────────────────────────

    /// Record a purchase: new tickers are appended, existing ones gain quantity.
    pub fn add_purchase(&mut self, purchase: Asset) -> Result<(), CoreError> {
        let next = self.portfolio_service.apply_purchase(&self.holdings, purchase)?;
        self.replace_holdings(next);
        Ok(())
    }

    /// Remove a ticker. Returns `true` if it was held.
    pub fn remove_asset(&mut self, ticker: &str) -> bool {
        let held = self.holdings.contains(ticker);
        if held {
            let next = self.portfolio_service.remove_asset(&self.holdings, ticker);
            self.replace_holdings(next);
        }
        held
    }

    /// Overwrite the quantity held of a ticker; 0 removes it.
    pub fn set_quantity(&mut self, ticker: &str, quantity: u64) -> Result<(), CoreError> {
        let next = self.portfolio_service.set_quantity(&self.holdings, ticker, quantity)?;
        self.replace_holdings(next);
        Ok(())
    }

    // ── Allocation Settings ─────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &AllocationSettings {
        &self.settings
    }

    /// Set the equity share of the class split; income funds get the rest.
    pub fn set_class_split(&mut self, equity_pct: f64) {
        let next = self
            .allocation_service
            .set_class_split(&self.settings, &self.holdings, equity_pct);
        self.replace_settings(next);
    }

    /// Set a held ticker's weight inside its class.
    pub fn set_ticker_weight(&mut self, ticker: &str, value: f64) -> Result<(), CoreError> {
        let class = self
            .holdings
            .get(ticker)
            .map(|a| a.class)
            .ok_or_else(|| CoreError::AssetNotFound(normalize_ticker(ticker)))?;
        let next = self.allocation_service.set_ticker_weight(
            &self.settings,
            &self.holdings,
            ticker,
            value,
            class,
        );
        self.replace_settings(next);
        Ok(())
    }

    #[must_use]
    pub fn validate_settings(&self) -> AllocationValidation {
        self.allocation_service.validate(&self.settings, &self.holdings)
    }

    /// Sum of the weights configured for the held tickers of a class.
    #[must_use]
    pub fn class_weight_total(&self, class: AssetClass) -> f64 {
        self.allocation_service
            .class_weight_total(&self.settings, &self.holdings, class)
    }

    /// A held ticker's weight expressed as a share of the whole portfolio.
    #[must_use]
    pub fn portfolio_target_pct(&self, ticker: &str) -> Option<f64> {
        let asset = self.holdings.get(ticker)?;
        Some(self.allocation_service.class_weight_to_portfolio_pct(
            &self.settings,
            asset.class,
            self.settings.weight(&asset.ticker),
        ))
    }

    // ── Suggestions ─────────────────────────────────────────────────

    /// Run the rebalancer for `cash` and keep the plan for selection/confirmation.
    /// A validation failure discards any previous plan.
    pub fn generate_suggestions(&mut self, cash: f64) -> Result<&SuggestionPlan, CoreError> {
        self.plan = None;
        let plan = self
            .rebalance_service
            .suggest(&self.holdings, &self.settings, cash)?;
        Ok(self.plan.insert(plan))
    }

    #[must_use]
    pub fn suggestion_plan(&self) -> Option<&SuggestionPlan> {
        self.plan.as_ref()
    }

    /// Flip the selection of one suggestion.
    /// Returns the new state, or `None` if there is no such suggestion.
    pub fn toggle_suggestion(&mut self, ticker: &str) -> Option<bool> {
        self.plan.as_mut()?.toggle(ticker)
    }

    #[must_use]
    pub fn selection_summary(&self) -> Option<SelectionSummary> {
        self.plan.as_ref().map(|p| p.summary())
    }

    /// Apply the selected suggestions to holdings and discard the plan.
    /// Returns the number of purchases applied.
    pub fn confirm_suggestions(&mut self) -> Result<usize, CoreError> {
        let plan = self
            .plan
            .as_ref()
            .ok_or_else(|| CoreError::Validation("No suggestions to confirm".into()))?;
        if plan.selected.is_empty() {
            return Err(CoreError::Validation("Select at least one suggestion to confirm".into()));
        }
        let applied = plan.selected_suggestions().len();
        let next = self.portfolio_service.apply_suggestions(&self.holdings, plan)?;
        self.plan = None;
        self.replace_holdings(next);
        info!("Applied {applied} suggested purchase(s)");
        Ok(applied)
    }

    // ── Lookup & Prices ─────────────────────────────────────────────

    /// Search the lookup providers. Short queries and provider failures yield
    /// an empty list.
    pub async fn search_assets(&self, query: &str) -> Vec<LookupResult> {
        self.lookup_service.search(query).await
    }

    /// Update recorded prices of all holdings from the lookup providers.
    /// Returns the number of holdings whose price changed.
    pub async fn refresh_prices(&mut self) -> Result<usize, CoreError> {
        let tickers: Vec<String> = self.holdings.iter().map(|a| a.ticker.clone()).collect();
        let quotes = self.lookup_service.current_prices(&tickers).await?;
        let next = self.portfolio_service.refresh_prices(&self.holdings, &quotes);

        let changed = next
            .iter()
            .zip(self.holdings.iter())
            .filter(|(new, old)| new.price != old.price)
            .count();
        self.last_price_refresh = Some(Utc::now());
        if changed > 0 {
            self.replace_holdings(next);
        }
        debug!("Price refresh updated {changed} of {} holding(s)", tickers.len());
        Ok(changed)
    }

    #[must_use]
    pub fn last_price_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_price_refresh
    }

    #[must_use]
    pub fn lookup_provider_names(&self) -> Vec<String> {
        self.lookup_service.provider_names()
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export holdings and settings as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, CoreError> {
        let snapshot = PortfolioSnapshot {
            holdings: self.holdings.clone(),
            settings: self.settings.clone(),
        };
        serde_json::to_string_pretty(&snapshot)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))
    }

    /// Replace holdings and settings with an exported JSON snapshot.
    pub fn import_json(&mut self, json: &str) -> Result<(), CoreError> {
        let snapshot: PortfolioSnapshot = serde_json::from_str(json)?;
        Self::check_snapshot(&snapshot)?;
        self.holdings = snapshot.holdings;
        self.plan = None;
        self.replace_settings(snapshot.settings);
        Ok(())
    }

    /// Returns `true` if holdings or settings changed since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(
        config: TrackerConfig,
        registry: LookupProviderRegistry,
        holdings: Holdings,
        settings: AllocationSettings,
    ) -> Self {
        let lookup_service = LookupService::new(registry).with_min_query_len(config.min_query_len);
        let mut tracker = Self {
            holdings,
            settings: AllocationSettings::default(),
            plan: None,
            last_price_refresh: None,
            storage: StorageManager::new(config.holdings_key, config.settings_key),
            valuation_service: ValuationService::new(),
            allocation_service: AllocationService::new(),
            rebalance_service: RebalanceService::new(),
            portfolio_service: PortfolioService::new(),
            lookup_service,
            dirty: false,
        };
        tracker.replace_settings(settings);
        // Re-applying the rules to freshly loaded values is not a user change
        tracker.dirty = false;
        tracker
    }

    fn replace_holdings(&mut self, holdings: Holdings) {
        self.holdings = holdings;
        self.plan = None;
        let settings = self.settings.clone();
        self.replace_settings(settings);
    }

    /// Single entry point for settings changes: re-applies the allocation rules.
    fn replace_settings(&mut self, settings: AllocationSettings) {
        self.settings = self.allocation_service.recompute(&settings, &self.holdings);
        self.dirty = true;
    }

    /// Rules for imported data:
    /// - Class percentages within 0..=100 and adding up to 100
    /// - Every ticker weight finite and within 0..=100
    /// - Every unit price finite and positive
    fn check_snapshot(snapshot: &PortfolioSnapshot) -> Result<(), CoreError> {
        let settings = &snapshot.settings;
        let in_range = |pct: f64| pct.is_finite() && (0.0..=100.0).contains(&pct);

        if !in_range(settings.equity_pct) || !in_range(settings.income_fund_pct) {
            return Err(CoreError::Validation(format!(
                "Class percentages must be between 0 and 100 (got {} / {})",
                settings.equity_pct, settings.income_fund_pct
            )));
        }
        let split_total = settings.equity_pct + settings.income_fund_pct;
        if (split_total - 100.0).abs() > 1e-9 {
            return Err(CoreError::Validation(format!(
                "Class split must add up to 100 (got {} + {})",
                settings.equity_pct, settings.income_fund_pct
            )));
        }
        if let Some((ticker, weight)) = settings.ticker_weights.iter().find(|(_, w)| !in_range(**w)) {
            return Err(CoreError::Validation(format!(
                "Weight for {ticker} must be between 0 and 100 (got {weight})"
            )));
        }
        if let Some(asset) = snapshot
            .holdings
            .iter()
            .find(|a| !a.price.is_finite() || a.price <= 0.0)
        {
            return Err(CoreError::Validation(format!(
                "Price for {} must be a positive number (got {})",
                asset.ticker, asset.price
            )));
        }
        Ok(())
    }

    fn ensure_settings_valid(&self) -> Result<(), CoreError> {
        let validation = self.validate_settings();
        if validation.is_valid() {
            return Ok(());
        }
        let classes: Vec<String> = AssetClass::ALL
            .iter()
            .filter(|c| validation.overflows(**c))
            .map(|c| c.to_string())
            .collect();
        Err(CoreError::Validation(format!(
            "Target weights exceed 100% within: {}",
            classes.join(", ")
        )))
    }
}
