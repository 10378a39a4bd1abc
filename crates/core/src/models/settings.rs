use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::asset::{normalize_ticker, AssetClass};

/// Default share of the portfolio targeted at equities.
pub const DEFAULT_EQUITY_PCT: f64 = 70.0;

/// Target allocation configured by the user.
///
/// Two levels: a class split (`equity_pct` + `income_fund_pct` = 100) and a
/// per-ticker weight map. A ticker's weight is its share *within its class*,
/// not of the whole portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSettings {
    /// Target percentage of total value held in equities
    pub equity_pct: f64,

    /// Target percentage of total value held in income funds
    pub income_fund_pct: f64,

    /// Ticker → target weight inside its class (0..=100)
    pub ticker_weights: BTreeMap<String, f64>,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            equity_pct: DEFAULT_EQUITY_PCT,
            income_fund_pct: 100.0 - DEFAULT_EQUITY_PCT,
            ticker_weights: BTreeMap::new(),
        }
    }
}

impl AllocationSettings {
    /// Target percentage for a class.
    pub fn class_pct(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Equity => self.equity_pct,
            AssetClass::IncomeFund => self.income_fund_pct,
        }
    }

    /// Configured weight for a ticker, 0 when absent.
    pub fn weight(&self, ticker: &str) -> f64 {
        self.ticker_weights
            .get(&normalize_ticker(ticker))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn has_weights(&self) -> bool {
        !self.ticker_weights.is_empty()
    }
}

/// Result of checking per-class weight totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationValidation {
    /// Equity weights sum to more than 100
    pub equity_overflow: bool,
    /// Income-fund weights sum to more than 100
    pub income_fund_overflow: bool,
}

impl AllocationValidation {
    pub fn is_valid(&self) -> bool {
        !self.equity_overflow && !self.income_fund_overflow
    }

    pub fn overflows(&self, class: AssetClass) -> bool {
        match class {
            AssetClass::Equity => self.equity_overflow,
            AssetClass::IncomeFund => self.income_fund_overflow,
        }
    }
}
