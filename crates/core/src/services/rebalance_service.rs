use log::{debug, info};

use crate::errors::CoreError;
use crate::models::asset::AssetClass;
use crate::models::holdings::Holdings;
use crate::models::settings::AllocationSettings;
use crate::models::suggestion::{Suggestion, SuggestionPlan};
use crate::models::valuation::{AssetShare, Distribution};
use crate::services::valuation_service::ValuationService;

/// Cash assigned to each class by the class-level split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassCash {
    pub equity: f64,
    pub income_fund: f64,
}

/// Turns a cash amount into whole-unit purchase suggestions that move the
/// portfolio toward its target allocation.
///
/// Two greedy phases:
/// 1. Split the cash between classes by how far each class is under target.
/// 2. Inside each class, walk tickers from largest to smallest shortfall and
///    buy as many whole units as the remaining class cash allows.
///
/// There is no second pass: cash a class could not place stays unallocated.
pub struct RebalanceService {
    valuation: ValuationService,
}

impl RebalanceService {
    pub fn new() -> Self {
        Self {
            valuation: ValuationService::new(),
        }
    }

    /// Produce a suggestion plan for investing `cash`.
    ///
    /// Fails with `CoreError::Validation` (and computes nothing) when holdings
    /// are empty, no ticker weight is configured, or `cash` is not a positive number.
    pub fn suggest(
        &self,
        holdings: &Holdings,
        settings: &AllocationSettings,
        cash: f64,
    ) -> Result<SuggestionPlan, CoreError> {
        Self::check_preconditions(holdings, settings, cash)?;

        let distribution = self.valuation.distribution(holdings);
        let class_cash = self.split_cash(&distribution, settings, cash);
        debug!(
            "Class split for {cash:.2}: equity {:.2}, income fund {:.2}",
            class_cash.equity, class_cash.income_fund
        );

        let mut suggestions = Vec::new();
        for class in AssetClass::ALL {
            let budget = match class {
                AssetClass::Equity => class_cash.equity,
                AssetClass::IncomeFund => class_cash.income_fund,
            };
            if budget <= 0.0 {
                continue;
            }
            let shares = self.valuation.class_shares(holdings, class);
            suggestions.extend(self.allocate_within_class(&shares, settings, budget));
        }

        let plan = SuggestionPlan::new(cash, class_cash.equity, class_cash.income_fund, suggestions);
        info!(
            "Generated {} suggestion(s) worth {:.2} of {:.2}",
            plan.suggestions.len(),
            plan.suggested_total(),
            cash
        );
        Ok(plan)
    }

    /// Phase 1: divide `cash` between the two classes.
    ///
    /// - Both classes under target: proportional to their deficits.
    /// - One class under target: it receives everything.
    /// - Neither under target: proportional to the target percentages.
    pub fn split_cash(
        &self,
        distribution: &Distribution,
        settings: &AllocationSettings,
        cash: f64,
    ) -> ClassCash {
        let equity_deficit = settings.equity_pct - distribution.equity_pct;
        let income_deficit = settings.income_fund_pct - distribution.income_fund_pct;

        let equity = if equity_deficit > 0.0 && income_deficit > 0.0 {
            equity_deficit / (equity_deficit + income_deficit) * cash
        } else if equity_deficit > 0.0 {
            cash
        } else if income_deficit > 0.0 {
            0.0
        } else {
            settings.equity_pct / 100.0 * cash
        };

        ClassCash {
            equity,
            income_fund: cash - equity,
        }
    }

    /// Phase 2: one greedy pass over the holdings of a single class.
    ///
    /// `shares` must all belong to the same class; their percentages are
    /// relative to the whole portfolio. Tickers with no configured weight
    /// target 0 and are therefore never bought.
    pub fn allocate_within_class(
        &self,
        shares: &[AssetShare],
        settings: &AllocationSettings,
        class_cash: f64,
    ) -> Vec<Suggestion> {
        let mut ranked: Vec<(&AssetShare, f64)> = shares
            .iter()
            .map(|s| (s, settings.weight(&s.asset.ticker) - s.percentage))
            .collect();
        // Stable: equal deficits keep holdings order
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut remaining = class_cash;
        let mut suggestions = Vec::new();

        for (share, deficit_pct) in ranked {
            let asset = &share.asset;
            if deficit_pct <= 0.0 || asset.price <= 0.0 || asset.price > remaining {
                continue;
            }

            let mut quantity = (remaining / asset.price).floor() as u64;
            // The quotient can round up to the next integer
            if quantity as f64 * asset.price > remaining {
                quantity -= 1;
            }
            if quantity == 0 {
                continue;
            }
            let value = quantity as f64 * asset.price;

            suggestions.push(Suggestion {
                ticker: asset.ticker.clone(),
                name: asset.name.clone(),
                price: asset.price,
                quantity,
                value,
                class: asset.class,
                deficit_pct,
            });
            remaining -= value;
        }

        suggestions
    }

    fn check_preconditions(
        holdings: &Holdings,
        settings: &AllocationSettings,
        cash: f64,
    ) -> Result<(), CoreError> {
        if holdings.is_empty() {
            return Err(CoreError::Validation(
                "Add assets to the portfolio before generating suggestions".into(),
            ));
        }
        if !settings.has_weights() {
            return Err(CoreError::Validation(
                "Configure target weights for your assets before generating suggestions".into(),
            ));
        }
        if !cash.is_finite() || cash <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Enter a valid amount to invest (got {cash})"
            )));
        }
        Ok(())
    }
}

impl Default for RebalanceService {
    fn default() -> Self {
        Self::new()
    }
}
