use thiserror::Error;

/// Result type for costing operations
pub type CostingResult<T> = Result<T, CostingError>;

/// Errors that can occur in the costing domain
///
/// Lookup misses are not errors: calculators resolve them with fallback
/// prices and report them as [`crate::models::LookupWarning`]s.
#[derive(Debug, Error)]
pub enum CostingError {
    /// The pricing catalog could not be read
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Invalid input data (pricing override, catalog document)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for CostingError {
    fn from(err: serde_json::Error) -> Self {
        CostingError::InvalidInput(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CostingError {
    fn from(err: validator::ValidationErrors) -> Self {
        CostingError::InvalidInput(err.to_string())
    }
}
