use serde::{Deserialize, Serialize};

use super::asset::{normalize_ticker, Asset, AssetClass};

/// Ordered collection of positions, unique by ticker.
///
/// Holdings are never edited in place by the services: every mutation
/// produces a new `Holdings` value which replaces the old one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Asset>", into = "Vec<Asset>")]
pub struct Holdings {
    assets: Vec<Asset>,
}

impl Holdings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build holdings from a list of assets.
    /// Later duplicates of a ticker are folded into the first occurrence,
    /// and zero-quantity entries are dropped.
    pub fn from_assets(assets: impl IntoIterator<Item = Asset>) -> Self {
        let mut out: Vec<Asset> = Vec::new();
        for asset in assets {
            if asset.quantity == 0 {
                continue;
            }
            match out.iter_mut().find(|a| a.ticker == asset.ticker) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(asset.quantity),
                None => out.push(asset),
            }
        }
        Self { assets: out }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Find a position by ticker (case-insensitive).
    pub fn get(&self, ticker: &str) -> Option<&Asset> {
        let key = normalize_ticker(ticker);
        self.assets.iter().find(|a| a.ticker == key)
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.get(ticker).is_some()
    }

    /// Positions of one class, in holdings order.
    pub fn of_class(&self, class: AssetClass) -> impl Iterator<Item = &Asset> {
        self.assets.iter().filter(move |a| a.class == class)
    }

    /// Tickers of one class, in holdings order.
    pub fn tickers_of_class(&self, class: AssetClass) -> Vec<&str> {
        self.of_class(class).map(|a| a.ticker.as_str()).collect()
    }

    pub fn into_assets(self) -> Vec<Asset> {
        self.assets
    }
}

impl<'a> IntoIterator for &'a Holdings {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}

impl FromIterator<Asset> for Holdings {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> Self {
        Self::from_assets(iter)
    }
}

impl From<Vec<Asset>> for Holdings {
    fn from(assets: Vec<Asset>) -> Self {
        Self::from_assets(assets)
    }
}

impl From<Holdings> for Vec<Asset> {
    fn from(holdings: Holdings) -> Self {
        holdings.assets
    }
}
