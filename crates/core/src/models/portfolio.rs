use serde::{Deserialize, Serialize};

use super::holdings::Holdings;
use super::settings::AllocationSettings;

/// Everything a session persists: the positions and the target allocation.
///
/// Used for human-readable JSON export/import; the key-value store keeps the
/// two halves as separate blobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Current positions
    pub holdings: Holdings,

    /// Target allocation
    #[serde(default)]
    pub settings: AllocationSettings,
}
