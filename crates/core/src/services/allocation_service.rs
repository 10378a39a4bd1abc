use log::debug;

use crate::models::asset::{normalize_ticker, AssetClass};
use crate::models::holdings::Holdings;
use crate::models::settings::{AllocationSettings, AllocationValidation};

/// Maximum weight or class percentage.
pub const FULL_PCT: f64 = 100.0;

/// Edits and validates the two-level target allocation.
///
/// Every operation takes the current settings by reference and returns a new
/// value. Weights are intra-class shares, so a class with a single ticker
/// always targets that ticker at 100 (`recompute` enforces this).
pub struct AllocationService;

impl AllocationService {
    pub fn new() -> Self {
        Self
    }

    /// Set the class split: equities get `equity_pct` (clamped to 0..=100),
    /// income funds get the rest.
    pub fn set_class_split(
        &self,
        settings: &AllocationSettings,
        holdings: &Holdings,
        equity_pct: f64,
    ) -> AllocationSettings {
        let equity_pct = clamp_pct(equity_pct);
        let mut next = settings.clone();
        next.equity_pct = equity_pct;
        next.income_fund_pct = FULL_PCT - equity_pct;
        self.recompute(&next, holdings)
    }

    /// Set one ticker's weight inside `class`.
    ///
    /// The value is clamped to 0..=100. When the class has other tickers and
    /// the new class total would exceed 100, the other weights are scaled by
    /// `(100 - value) / sum_of_others` so the edited ticker keeps its value.
    /// If the others sum to 0 nothing is scaled.
    pub fn set_ticker_weight(
        &self,
        settings: &AllocationSettings,
        holdings: &Holdings,
        ticker: &str,
        value: f64,
        class: AssetClass,
    ) -> AllocationSettings {
        let ticker = normalize_ticker(ticker);
        let value = clamp_pct(value);

        let mut next = settings.clone();
        next.ticker_weights.insert(ticker.clone(), value);

        let class_tickers = holdings.tickers_of_class(class);
        if class_tickers.len() > 1 {
            let others: Vec<&str> = class_tickers
                .into_iter()
                .filter(|t| *t != ticker)
                .collect();
            let others_total: f64 = others.iter().map(|t| next.weight(t)).sum();

            if others_total + value > FULL_PCT && others_total > 0.0 {
                let reduction_factor = (FULL_PCT - value) / others_total;
                debug!(
                    "Weight of {ticker} set to {value:.2}; scaling {} other {class} weights by {reduction_factor:.4}",
                    others.len()
                );
                for other in others {
                    let current = next.weight(other);
                    next.ticker_weights
                        .insert(other.to_string(), current * reduction_factor);
                }
            }
        }

        next
    }

    /// Sum of the weights configured for tickers of `class` present in holdings.
    pub fn class_weight_total(
        &self,
        settings: &AllocationSettings,
        holdings: &Holdings,
        class: AssetClass,
    ) -> f64 {
        holdings
            .of_class(class)
            .map(|a| settings.weight(&a.ticker))
            .sum()
    }

    /// Flag each class whose weights add up to more than 100.
    pub fn validate(&self, settings: &AllocationSettings, holdings: &Holdings) -> AllocationValidation {
        AllocationValidation {
            equity_overflow: self.class_weight_total(settings, holdings, AssetClass::Equity) > FULL_PCT,
            income_fund_overflow: self.class_weight_total(settings, holdings, AssetClass::IncomeFund)
                > FULL_PCT,
        }
    }

    /// Re-apply derived rules after any settings or holdings change.
    ///
    /// A class with exactly one ticker pins that ticker's weight to 100,
    /// overriding whatever was set manually.
    pub fn recompute(&self, settings: &AllocationSettings, holdings: &Holdings) -> AllocationSettings {
        let mut next = settings.clone();
        for class in AssetClass::ALL {
            let tickers = holdings.tickers_of_class(class);
            if let [only] = tickers.as_slice() {
                if next.weight(only) != FULL_PCT {
                    debug!("Pinning weight of {only}, the only {class} holding, to 100");
                    next.ticker_weights.insert(only.to_string(), FULL_PCT);
                }
            }
        }
        next
    }

    /// Convert an intra-class weight into a share of the whole portfolio.
    /// E.g. weight 50 in a class targeted at 70% is 35% of the portfolio.
    pub fn class_weight_to_portfolio_pct(
        &self,
        settings: &AllocationSettings,
        class: AssetClass,
        weight: f64,
    ) -> f64 {
        weight / FULL_PCT * settings.class_pct(class)
    }
}

impl Default for AllocationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp a percentage into 0..=100. NaN counts as 0.
fn clamp_pct(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, FULL_PCT)
    } else if value == f64::INFINITY {
        FULL_PCT
    } else {
        0.0
    }
}
