use thiserror::Error;

/// Unified error type for the entire portfolio-rebalancer-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage / Blobs ─────────────────────────────────────────────
    #[error("Invalid blob format: {0}")]
    InvalidBlobFormat(String),

    #[error("Unsupported blob version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // ── Lookup providers ────────────────────────────────────────────
    #[error("Lookup error ({provider}): {message}")]
    Lookup {
        provider: String,
        message: String,
    },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),
}

impl CoreError {
    /// `true` for user-input errors that should be shown as a blocking message
    /// rather than treated as a fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
