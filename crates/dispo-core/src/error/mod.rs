//! Error types and exit codes for dispo
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, validation)
//! - 3: Data/store error (missing store, unknown buyer, etc.)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes reported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - missing store, unknown id (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for DispoError {
    fn from(err: rusqlite::Error) -> Self {
        DispoError::Other(err.to_string())
    }
}

/// Errors that can occur during dispo operations
#[derive(Error, Debug)]
pub enum DispoError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or records)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("unsupported {context}: {value} (supported: {supported})")]
    Unsupported {
        context: String,
        value: String,
        supported: String,
    },

    // Data/store errors (exit code 3)
    #[error("store not found (searched from {search_root:?})")]
    StoreNotFound { search_root: PathBuf },

    #[error("invalid store: {reason}")]
    InvalidStore { reason: String },

    #[error("buyer not found: {id}")]
    BuyerNotFound { id: String },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    #[error("{context} already exists: {value}")]
    AlreadyExists { context: String, value: String },

    #[error("tag is protected: {name}")]
    ProtectedTag { name: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl DispoError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        DispoError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed buyer operation
    pub fn buyer_operation(buyer_id: &str, operation: &str, error: impl std::fmt::Display) -> Self {
        DispoError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: format!("buyer {}", buyer_id),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        DispoError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that already exists
    pub fn already_exists(context: &str, value: impl std::fmt::Display) -> Self {
        DispoError::AlreadyExists {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        DispoError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an unsupported value
    pub fn unsupported(
        context: &str,
        value: impl std::fmt::Display,
        supported: impl std::fmt::Display,
    ) -> Self {
        DispoError::Unsupported {
            context: context.to_string(),
            value: value.to_string(),
            supported: supported.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            // Usage errors
            DispoError::UnknownFormat(_)
            | DispoError::UsageError(_)
            | DispoError::InvalidValue { .. }
            | DispoError::Unsupported { .. } => ExitCode::Usage,

            // Data/store errors
            DispoError::StoreNotFound { .. }
            | DispoError::InvalidStore { .. }
            | DispoError::BuyerNotFound { .. }
            | DispoError::NotFound { .. }
            | DispoError::AlreadyExists { .. }
            | DispoError::ProtectedTag { .. } => ExitCode::Data,

            // Generic failures
            DispoError::Io(_)
            | DispoError::Json(_)
            | DispoError::Toml(_)
            | DispoError::FailedOperation { .. }
            | DispoError::FailedOperationWithTarget { .. }
            | DispoError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            DispoError::UnknownFormat(_) => "unknown_format",
            DispoError::UsageError(_) => "usage_error",
            DispoError::InvalidValue { .. } => "invalid_value",
            DispoError::Unsupported { .. } => "unsupported",
            DispoError::StoreNotFound { .. } => "store_not_found",
            DispoError::InvalidStore { .. } => "invalid_store",
            DispoError::BuyerNotFound { .. } => "buyer_not_found",
            DispoError::NotFound { .. } => "not_found",
            DispoError::AlreadyExists { .. } => "already_exists",
            DispoError::ProtectedTag { .. } => "protected_tag",
            DispoError::Io(_) => "io_error",
            DispoError::Json(_) => "json_error",
            DispoError::Toml(_) => "toml_error",
            DispoError::FailedOperation { .. } => "failed_operation",
            DispoError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            DispoError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for dispo operations
pub type Result<T> = std::result::Result<T, DispoError>;
