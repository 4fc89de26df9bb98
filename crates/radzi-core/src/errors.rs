//! Unified error system for the Radzi client core
//!
//! A single error enum shared by every layer, plus a coarse category used by
//! frontends to decide how (and whether) a failure is shown to the user.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::effects::{ApiError, AuthError, StorageError, TimeError};

/// Unified error type for all Radzi client operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RadziError {
    /// Invalid input or value
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Network or remote API error
    #[error("Network error: {message}")]
    Network {
        /// Error message describing the network issue
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Configuration error
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl RadziError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Classify this error for frontend treatment.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Invalid { .. } => ErrorCategory::Input,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Network { .. } => ErrorCategory::Network,
            Self::Config { .. } => ErrorCategory::Config,
            Self::Serialization { .. } | Self::Storage { .. } | Self::Internal { .. } => {
                ErrorCategory::Operation
            }
        }
    }
}

impl From<StorageError> for RadziError {
    fn from(err: StorageError) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<ApiError> for RadziError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Decode { .. } => Self::serialization(err.to_string()),
            ApiError::InvalidRequest { .. } => Self::invalid(err.to_string()),
            ApiError::Status { status: 404, .. } => Self::not_found(err.to_string()),
            _ => Self::network(err.to_string()),
        }
    }
}

impl From<AuthError> for RadziError {
    fn from(err: AuthError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<TimeError> for RadziError {
    fn from(err: TimeError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<serde_json::Error> for RadziError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories for frontend error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// User input validation errors (correctable by user)
    Input,
    /// Configuration errors (correctable by modifying settings)
    Config,
    /// Resource not found errors
    NotFound,
    /// Network connectivity errors (often transient)
    Network,
    /// General operation failures (catch-all)
    Operation,
}

impl ErrorCategory {
    /// Check if this error category is likely transient.
    ///
    /// Transient errors may resolve when the query is issued again.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Config => "Config",
            Self::NotFound => "Not Found",
            Self::Network => "Network",
            Self::Operation => "Operation",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_categories() {
        let err: RadziError = ApiError::Status {
            status: 503,
            url: "https://api.radzi.app/v1/feedback/global".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.category().is_transient());

        let err: RadziError = ApiError::Decode {
            reason: "expected array".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Operation);
    }

    #[test]
    fn missing_resource_is_not_found() {
        let err: RadziError = ApiError::Status {
            status: 404,
            url: "https://api.radzi.app/v1/road-sections/personal".into(),
        }
        .into();
        assert!(matches!(err, RadziError::NotFound { .. }));
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.category().is_transient());
    }

    #[test]
    fn storage_errors_are_not_transient() {
        let err: RadziError = StorageError::WriteFailed("disk full".into()).into();
        assert!(matches!(err, RadziError::Storage { .. }));
        assert!(!err.category().is_transient());
    }
}
