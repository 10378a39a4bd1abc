use serde::{Deserialize, Serialize};

use super::asset::{Asset, AssetClass};

/// Share of total portfolio value held in each class, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub equity_pct: f64,
    pub income_fund_pct: f64,
}

impl Distribution {
    pub fn class_pct(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Equity => self.equity_pct,
            AssetClass::IncomeFund => self.income_fund_pct,
        }
    }
}

/// A position annotated with its market value and share of the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetShare {
    /// The position
    pub asset: Asset,

    /// price × quantity
    pub value: f64,

    /// value / total portfolio value × 100 (0 when the portfolio is worth nothing)
    pub percentage: f64,
}

/// Render a monetary amount with two decimals.
/// Rounding happens only here; computations keep full precision.
pub fn format_money(value: f64) -> String {
    format!("{value:.2}")
}
