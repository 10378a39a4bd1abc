use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::asset::{normalize_ticker, Asset};
use crate::models::holdings::Holdings;
use crate::models::lookup::PriceQuote;
use crate::models::suggestion::{Suggestion, SuggestionPlan};

/// Applies purchases, removals and price updates to holdings.
///
/// Pure business logic — no I/O. Each operation returns a new `Holdings`;
/// the input is left untouched, so a failed operation changes nothing.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Add a purchase to holdings.
    ///
    /// An existing ticker gets its quantity increased and keeps its recorded
    /// price. A new ticker is appended.
    pub fn apply_purchase(&self, holdings: &Holdings, purchase: Asset) -> Result<Holdings, CoreError> {
        self.validate_purchase(&purchase)?;

        let mut assets = holdings.assets().to_vec();
        match assets.iter_mut().find(|a| a.ticker == purchase.ticker) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(purchase.quantity).ok_or_else(|| {
                    CoreError::Validation(format!("Quantity overflow for {}", purchase.ticker))
                })?;
                debug!(
                    "Added {} unit(s) to {} (now {})",
                    purchase.quantity, existing.ticker, existing.quantity
                );
            }
            None => {
                debug!("New holding {} ({} unit(s))", purchase.ticker, purchase.quantity);
                assets.push(purchase);
            }
        }
        Ok(Holdings::from_assets(assets))
    }

    /// Remove a ticker. Removing an absent ticker is a no-op.
    pub fn remove_asset(&self, holdings: &Holdings, ticker: &str) -> Holdings {
        let key = normalize_ticker(ticker);
        holdings.iter().filter(|a| a.ticker != key).cloned().collect()
    }

    /// Overwrite the quantity held of a ticker. A quantity of 0 removes it.
    pub fn set_quantity(&self, holdings: &Holdings, ticker: &str, quantity: u64) -> Result<Holdings, CoreError> {
        let key = normalize_ticker(ticker);
        if !holdings.contains(&key) {
            return Err(CoreError::AssetNotFound(key));
        }
        Ok(holdings
            .iter()
            .cloned()
            .map(|mut a| {
                if a.ticker == key {
                    a.quantity = quantity;
                }
                a
            })
            .collect())
    }

    /// Apply every selected suggestion of a plan, in suggestion order.
    ///
    /// Refused when the selection costs more than the plan's cash.
    pub fn apply_suggestions(&self, holdings: &Holdings, plan: &SuggestionPlan) -> Result<Holdings, CoreError> {
        let summary = plan.summary();
        if summary.excess > 0.0 {
            return Err(CoreError::Validation(format!(
                "Selected purchases total {:.2}, exceeding the {:.2} available by {:.2}",
                summary.selected_total, plan.cash, summary.excess
            )));
        }

        let mut next = holdings.clone();
        for suggestion in plan.selected_suggestions() {
            next = self.apply_purchase(&next, Self::purchase_from(suggestion))?;
        }
        Ok(next)
    }

    /// Update recorded prices from fresh quotes.
    /// Quotes for unknown tickers or with invalid prices are ignored.
    pub fn refresh_prices(&self, holdings: &Holdings, quotes: &[PriceQuote]) -> Holdings {
        holdings
            .iter()
            .cloned()
            .map(|mut asset| {
                if let Some(quote) = quotes.iter().find(|q| normalize_ticker(&q.ticker) == asset.ticker) {
                    if quote.price.is_finite() && quote.price > 0.0 {
                        asset.price = quote.price;
                    } else {
                        warn!("Ignoring invalid price {} for {}", quote.price, asset.ticker);
                    }
                }
                asset
            })
            .collect()
    }

    fn purchase_from(suggestion: &Suggestion) -> Asset {
        Asset::new(
            suggestion.ticker.clone(),
            suggestion.name.clone(),
            suggestion.price,
            suggestion.quantity,
            suggestion.class,
        )
    }

    /// Rules:
    /// - Ticker must not be empty
    /// - Quantity must be positive
    /// - Price must be finite and positive
    fn validate_purchase(&self, purchase: &Asset) -> Result<(), CoreError> {
        if purchase.ticker.is_empty() {
            return Err(CoreError::Validation("Ticker must not be empty".into()));
        }
        if purchase.quantity == 0 {
            return Err(CoreError::Validation(format!(
                "Purchase quantity for {} must be positive",
                purchase.ticker
            )));
        }
        if !purchase.price.is_finite() || purchase.price <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Price for {} must be a positive number (got {})",
                purchase.ticker, purchase.price
            )));
        }
        Ok(())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
