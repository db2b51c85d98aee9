//! Error types and exit codes for rubric
//!
//! Errors fall into four families:
//! - validation: bad bounds, out-of-range or misaligned values, division by
//!   zero, malformed block shapes, unsupported descriptors
//! - not found: unknown method or entity ids
//! - structural integrity: persisted data that cannot be turned back into a tree
//! - everything else (I/O, database, serialization)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the rubric binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage or validation error (2)
    Usage = 2,
    /// Unknown entity or missing store (3)
    Data = 3,
    /// Persisted data is corrupt (4)
    Integrity = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Error taxonomy exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    StructuralIntegrity,
    Failure,
}

impl From<rusqlite::Error> for RubricError {
    fn from(err: rusqlite::Error) -> Self {
        RubricError::FailedOperation {
            operation: "query database".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Errors that can occur during rubric operations
#[derive(Error, Debug)]
pub enum RubricError {
    // Validation errors
    #[error("invalid bounds for '{name}': min {min} is greater than max {max}")]
    InvalidBounds { name: String, min: f64, max: f64 },

    #[error("value {value} for '{name}' is outside [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("value {value} for '{name}' is not reachable from {min} in steps of {step}")]
    StepMisaligned {
        name: String,
        value: f64,
        min: f64,
        step: f64,
    },

    #[error("'{name}' has not been graded")]
    Ungraded { name: String },

    #[error("division by zero while evaluating '{name}'")]
    DivisionByZero { name: String },

    #[error("block '{name}' has {children} components but {actions} actions (expected {expected})", expected = .children.saturating_sub(1))]
    ActionCountMismatch {
        name: String,
        children: usize,
        actions: usize,
    },

    #[error("block '{name}' has no components")]
    EmptyBlock { name: String },

    #[error("unsupported component type: {0} (supported: grade, block)")]
    UnsupportedComponentType(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("{0}")]
    UsageError(String),

    // Lookup errors
    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    #[error("store not found (searched from {search_root:?})")]
    StoreNotFound { search_root: PathBuf },

    // Persisted data errors
    #[error("structural integrity violation: {reason}")]
    StructuralIntegrity { reason: String },

    // Generic failures
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl RubricError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        RubricError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed transaction operation
    pub fn transaction(operation: &str, error: impl std::fmt::Display) -> Self {
        RubricError::FailedOperation {
            operation: format!("{} transaction", operation),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        RubricError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        RubricError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for persisted data that cannot be reconstructed
    pub fn integrity(reason: impl Into<String>) -> Self {
        RubricError::StructuralIntegrity {
            reason: reason.into(),
        }
    }

    /// Which family of the taxonomy this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            RubricError::InvalidBounds { .. }
            | RubricError::OutOfRange { .. }
            | RubricError::StepMisaligned { .. }
            | RubricError::Ungraded { .. }
            | RubricError::DivisionByZero { .. }
            | RubricError::ActionCountMismatch { .. }
            | RubricError::EmptyBlock { .. }
            | RubricError::UnsupportedComponentType(_)
            | RubricError::InvalidValue { .. }
            | RubricError::UsageError(_) => ErrorKind::Validation,

            RubricError::NotFound { .. } | RubricError::StoreNotFound { .. } => {
                ErrorKind::NotFound
            }

            RubricError::StructuralIntegrity { .. } => ErrorKind::StructuralIntegrity,

            RubricError::Io(_)
            | RubricError::Json(_)
            | RubricError::Toml(_)
            | RubricError::FailedOperation { .. }
            | RubricError::Other(_) => ErrorKind::Failure,
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self.kind() {
            ErrorKind::Validation => ExitCode::Usage,
            ErrorKind::NotFound => ExitCode::Data,
            ErrorKind::StructuralIntegrity => ExitCode::Integrity,
            ErrorKind::Failure => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            RubricError::InvalidBounds { .. } => "invalid_bounds",
            RubricError::OutOfRange { .. } => "out_of_range",
            RubricError::StepMisaligned { .. } => "step_misaligned",
            RubricError::Ungraded { .. } => "ungraded",
            RubricError::DivisionByZero { .. } => "division_by_zero",
            RubricError::ActionCountMismatch { .. } => "action_count_mismatch",
            RubricError::EmptyBlock { .. } => "empty_block",
            RubricError::UnsupportedComponentType(_) => "unsupported_component_type",
            RubricError::InvalidValue { .. } => "invalid_value",
            RubricError::UsageError(_) => "usage_error",
            RubricError::NotFound { .. } => "not_found",
            RubricError::StoreNotFound { .. } => "store_not_found",
            RubricError::StructuralIntegrity { .. } => "structural_integrity",
            RubricError::Io(_) => "io_error",
            RubricError::Json(_) => "json_error",
            RubricError::Toml(_) => "toml_error",
            RubricError::FailedOperation { .. } => "failed_operation",
            RubricError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
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

/// Result type alias for rubric operations
pub type Result<T> = std::result::Result<T, RubricError>;
