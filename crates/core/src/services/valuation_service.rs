use crate::models::asset::AssetClass;
use crate::models::holdings::Holdings;
use crate::models::valuation::{AssetShare, Distribution};

/// Computes market value, class distribution and per-asset shares of a portfolio.
///
/// No I/O. Values are `price × quantity` using the
/// last recorded price of each holding.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Total market value. Empty holdings are worth 0.
    pub fn total_value(&self, holdings: &Holdings) -> f64 {
        holdings.iter().map(|a| a.value()).sum()
    }

    /// Market value of one class.
    pub fn class_value(&self, holdings: &Holdings, class: AssetClass) -> f64 {
        holdings.of_class(class).map(|a| a.value()).sum()
    }

    /// Percentage of total value held in each class.
    /// Returns `{0, 0}` for a portfolio worth nothing.
    pub fn distribution(&self, holdings: &Holdings) -> Distribution {
        let total = self.total_value(holdings);
        if total <= 0.0 {
            return Distribution::default();
        }
        Distribution {
            equity_pct: self.class_value(holdings, AssetClass::Equity) / total * 100.0,
            income_fund_pct: self.class_value(holdings, AssetClass::IncomeFund) / total * 100.0,
        }
    }

    /// Every holding annotated with its value and percentage of the total,
    /// in holdings order. All percentages are 0 when the total is 0.
    pub fn with_percentages(&self, holdings: &Holdings) -> Vec<AssetShare> {
        let total = self.total_value(holdings);
        holdings
            .iter()
            .map(|asset| {
                let value = asset.value();
                AssetShare {
                    asset: asset.clone(),
                    value,
                    percentage: if total > 0.0 { value / total * 100.0 } else { 0.0 },
                }
            })
            .collect()
    }

    /// `with_percentages` restricted to one class. Percentages stay relative
    /// to the whole portfolio, not to the class.
    pub fn class_shares(&self, holdings: &Holdings, class: AssetClass) -> Vec<AssetShare> {
        self.with_percentages(holdings)
            .into_iter()
            .filter(|s| s.asset.class == class)
            .collect()
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
