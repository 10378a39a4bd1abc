pub mod registry;
pub mod traits;

// Provider implementations
pub mod mock_market;
