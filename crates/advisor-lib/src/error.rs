//! Error types for the parameter advisor

use thiserror::Error;

/// Errors returned by the recommendation engine and the hardware catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
    /// Sizing field missing, non-positive or outside the catalog
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Role and sizing are individually valid but not together
    #[error("Invalid combination: {0}")]
    InvalidCombination(String),
}

impl AdvisorError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AdvisorError::InvalidInput(_) => "invalid_input",
            AdvisorError::InvalidCombination(_) => "invalid_combination",
        }
    }

    /// User-facing advice on how to fix the request
    pub fn guidance(&self) -> &'static str {
        match self {
            AdvisorError::InvalidInput(_) => {
                "Select CPU and memory values from the supported hardware catalog."
            }
            AdvisorError::InvalidCombination(_) => {
                "OLAP workloads need at least 8 CPUs. Select a higher CPU value."
            }
        }
    }
}

/// Errors from writing an audit entry
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Audit log I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize audit entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Audit blob request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Audit blob store returned {status} for {operation}")]
    UnexpectedStatus { operation: &'static str, status: u16 },

    #[error("Invalid audit blob URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors from rendering a recommendation as CSV
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("CSV buffer could not be flushed: {0}")]
    Flush(String),
}
