use async_trait::async_trait;
use chrono::Utc;

use crate::errors::CoreError;
use crate::models::asset::{normalize_ticker, AssetClass};
use crate::models::lookup::{LookupResult, PriceQuote};
use super::traits::AssetLookupProvider;

/// Minimum query length for synthesizing an unknown ticker.
pub const MIN_SYNTHETIC_QUERY_LEN: usize = 4;

/// Income-fund tickers end in this suffix (e.g., "HGLG11").
const INCOME_FUND_SUFFIX: &str = "11";

/// Built-in catalog: (ticker, name, price, class).
const CATALOG: &[(&str, &str, f64, AssetClass)] = &[
    ("PETR4", "Petrobras", 36.78, AssetClass::Equity),
    ("VALE3", "Vale", 68.25, AssetClass::Equity),
    ("ITUB4", "Itaú Unibanco", 34.56, AssetClass::Equity),
    ("BBDC4", "Bradesco", 20.35, AssetClass::Equity),
    ("ABEV3", "Ambev", 14.92, AssetClass::Equity),
    ("HGLG11", "CSHG Logística", 162.50, AssetClass::IncomeFund),
    ("KNRI11", "Kinea Renda Imobiliária", 135.80, AssetClass::IncomeFund),
    ("MXRF11", "Maxi Renda", 10.75, AssetClass::IncomeFund),
    ("VISC11", "Vinci Shopping Centers", 108.15, AssetClass::IncomeFund),
];

/// Offline market used when no real data source is configured.
///
/// - **Search**: case-insensitive substring match on ticker or name.
/// - **Unknown tickers**: a query of 4+ characters with no catalog match yields
///   one synthesized "external" result with a deterministic price.
/// - **Quotes**: catalog prices; synthesized tickers have no quote.
pub struct MockMarketProvider;

impl MockMarketProvider {
    pub fn new() -> Self {
        Self
    }

    /// Deterministic placeholder price: 10 + (sum of character codes mod 200).
    pub fn synthetic_price(ticker: &str) -> f64 {
        let seed: u32 = ticker.chars().map(|c| c as u32).sum();
        10.0 + f64::from(seed % 200)
    }

    /// Class guessed from the ticker shape: 6+ characters ending in "11" is an income fund.
    pub fn infer_class(query: &str) -> AssetClass {
        if query.chars().count() >= 6 && query.ends_with(INCOME_FUND_SUFFIX) {
            AssetClass::IncomeFund
        } else {
            AssetClass::Equity
        }
    }

    fn catalog_matches(query: &str) -> Vec<LookupResult> {
        let needle = query.to_uppercase();
        CATALOG
            .iter()
            .filter(|(ticker, name, _, _)| {
                ticker.to_uppercase().contains(&needle) || name.to_uppercase().contains(&needle)
            })
            .map(|&(ticker, name, price, class)| LookupResult {
                ticker: ticker.to_string(),
                name: name.to_string(),
                price,
                class,
                is_external: false,
            })
            .collect()
    }

    fn synthesize(query: &str) -> LookupResult {
        let ticker = normalize_ticker(query);
        let class = Self::infer_class(query);
        let label = match class {
            AssetClass::IncomeFund => "Fund",
            AssetClass::Equity => "Company",
        };
        LookupResult {
            name: format!("{label} {ticker}"),
            price: Self::synthetic_price(&ticker),
            ticker,
            class,
            is_external: true,
        }
    }
}

impl Default for MockMarketProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetLookupProvider for MockMarketProvider {
    fn name(&self) -> &str {
        "MockMarket"
    }

    async fn search(&self, query: &str) -> Result<Vec<LookupResult>, CoreError> {
        let matches = Self::catalog_matches(query);
        if matches.is_empty() && query.chars().count() >= MIN_SYNTHETIC_QUERY_LEN {
            return Ok(vec![Self::synthesize(query)]);
        }
        Ok(matches)
    }

    async fn current_prices(&self, tickers: &[String]) -> Result<Vec<PriceQuote>, CoreError> {
        let now = Utc::now();
        Ok(tickers
            .iter()
            .filter_map(|t| {
                let key = normalize_ticker(t);
                CATALOG
                    .iter()
                    .find(|(ticker, _, _, _)| *ticker == key)
                    .map(|&(ticker, _, price, _)| PriceQuote {
                        ticker: ticker.to_string(),
                        price,
                        as_of: now,
                    })
            })
            .collect())
    }
}
