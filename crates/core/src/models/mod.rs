pub mod asset;
pub mod holdings;
pub mod lookup;
pub mod portfolio;
pub mod settings;
pub mod suggestion;
pub mod valuation;
