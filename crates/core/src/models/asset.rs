use serde::{Deserialize, Serialize};

/// Top-level category of a holding.
/// The target allocation is split between these two classes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetClass {
    /// Listed company shares
    Equity,
    /// Real-estate / income funds
    IncomeFund,
}

impl AssetClass {
    /// Both classes, in the order suggestions are emitted.
    pub const ALL: [AssetClass; 2] = [AssetClass::Equity, AssetClass::IncomeFund];
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::Equity => write!(f, "Equity"),
            AssetClass::IncomeFund => write!(f, "IncomeFund"),
        }
    }
}

/// A single position in the portfolio.
///
/// **Equality and hashing** are based solely on `ticker`. Holdings keep
/// tickers unique, so the ticker alone identifies a position regardless of
/// its recorded price or quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Ticker symbol, uppercased (e.g., "PETR4", "HGLG11")
    pub ticker: String,

    /// Human-readable name (e.g., "Petrobras")
    pub name: String,

    /// Last recorded unit price
    pub price: f64,

    /// Whole units held
    pub quantity: u64,

    /// Equity or income fund
    pub class: AssetClass,
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.ticker == other.ticker
    }
}

impl Eq for Asset {}

impl std::hash::Hash for Asset {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ticker.hash(state);
    }
}

impl Asset {
    pub fn new(
        ticker: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity: u64,
        class: AssetClass,
    ) -> Self {
        Self {
            ticker: normalize_ticker(&ticker.into()),
            name: name.into(),
            price,
            quantity,
            class,
        }
    }

    pub fn equity(ticker: impl Into<String>, name: impl Into<String>, price: f64, quantity: u64) -> Self {
        Self::new(ticker, name, price, quantity, AssetClass::Equity)
    }

    pub fn income_fund(
        ticker: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity: u64,
    ) -> Self {
        Self::new(ticker, name, price, quantity, AssetClass::IncomeFund)
    }

    /// Market value of the position: price × quantity.
    pub fn value(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Canonical form of a ticker used for every lookup and comparison.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}
