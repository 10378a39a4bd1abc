pub mod allocation_service;
pub mod lookup_service;
pub mod portfolio_service;
pub mod rebalance_service;
pub mod valuation_service;
