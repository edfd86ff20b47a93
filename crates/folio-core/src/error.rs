//! Error types for Folio

use thiserror::Error;

/// Result type alias using Folio's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Folio error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Network errors (E100-E199)
    #[error("Network error: {0}. Check that the backend is running and reachable.")]
    Network(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E100",
            Self::Status { .. } => "E101",
            Self::InvalidResponse(_) => "E102",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
            Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Network(_) => Some("folio config get backend.base_url".to_string()),
            Self::Status { status, .. } if *status >= 500 => {
                Some("Check the PHP error log and database permissions".to_string())
            }
            Self::Status { status: 404, endpoint } => {
                Some(format!("Ensure {} exists on the backend", endpoint))
            }
            Self::InvalidResponse(_) => {
                Some("Ensure the listing endpoint returns a JSON array".to_string())
            }
            Self::ConfigError(_) => Some("folio config list".to_string()),
            _ => None,
        }
    }

    /// True if the failure happened before or during transport
    /// (as opposed to the backend answering with an error)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
