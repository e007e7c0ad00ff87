//! Error types for catalog type resolution
//!
//! Two error families live here:
//! - [`CatalogError`] covers registration, construction and a single load attempt
//! - [`ResolutionFailure`] is the terminal outcome of a whole resolution call and
//!   carries every attempt made along the way
//!
//! # Error Codes
//!
//! Each variant has a stable error code (e.g. `UNKNOWN_TYPE`) that the
//! presentation layer can map to its own user-facing messages. Messages are
//! not localized here.
//!
//! # Example
//!
//! ```rust
//! use catalog_core::error::{CatalogError, ErrorCategory};
//!
//! let err = CatalogError::UnknownType { type_id: "wms".to_string() };
//! assert_eq!(err.error_code(), "UNKNOWN_TYPE");
//! assert_eq!(err.category(), ErrorCategory::NotFound);
//! assert!(!err.is_recoverable());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::Tier;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Boxed error returned by factories and member probes
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// No factory or rule for the request
    NotFound,
    /// Bad rule, pattern or configuration
    Validation,
    /// Registration conflict
    Conflict,
    /// A member failed its own probe
    Load,
    /// Caller aborted the resolution
    Cancelled,
    /// I/O or serialization
    External,
}

/// Errors raised by the registry, rule set and individual load attempts
#[derive(Error, Debug)]
pub enum CatalogError {
    // ═══════════════════════════════════════════════════════════════════════
    // Registry errors
    // ═══════════════════════════════════════════════════════════════════════

    /// No factory is registered under this type identifier
    #[error("Unknown catalog member type: '{type_id}'. Register a factory for it before resolving.")]
    UnknownType { type_id: String },

    /// The factory itself failed to build a member
    #[error("Failed to construct catalog member of type '{type_id}': {reason}")]
    Construction { type_id: String, reason: String },

    /// Strict registration refused a second factory for the same type
    #[error("Catalog member type already registered: '{type_id}'. Strict registration does not allow overrides.")]
    DuplicateType { type_id: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Load errors
    // ═══════════════════════════════════════════════════════════════════════

    /// The constructed member rejected the data during its probe
    #[error("Catalog member of type '{type_id}' failed to load: {reason}")]
    Load { type_id: String, reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Rule and configuration errors
    // ═══════════════════════════════════════════════════════════════════════

    /// A URL rule could not be built
    #[error("Invalid resolution rule: {reason}")]
    InvalidRule { reason: String },

    /// Resolver configuration is malformed
    #[error("Invalid resolver configuration: {reason}")]
    InvalidConfig { reason: String },

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("IO error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io {
            message: err.to_string(),
        }
    }
}

impl CatalogError {
    /// Returns true if a speculative resolution may advance past this error
    ///
    /// Only a failed load probe is evidence of misclassification. Unknown
    /// types and construction failures are configuration problems for that
    /// type and are recorded, but they never count as a recoverable guess.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CatalogError::Load { .. })
    }

    /// The type identifier this error is about, if any
    pub fn type_id(&self) -> Option<&str> {
        match self {
            CatalogError::UnknownType { type_id }
            | CatalogError::Construction { type_id, .. }
            | CatalogError::DuplicateType { type_id }
            | CatalogError::Load { type_id, .. } => Some(type_id),
            _ => None,
        }
    }

    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::UnknownType { .. } => ErrorCategory::NotFound,

            CatalogError::Construction { .. }
            | CatalogError::InvalidRule { .. }
            | CatalogError::InvalidConfig { .. } => ErrorCategory::Validation,

            CatalogError::DuplicateType { .. } => ErrorCategory::Conflict,

            CatalogError::Load { .. } => ErrorCategory::Load,

            CatalogError::Json(_) | CatalogError::Io { .. } => ErrorCategory::External,
        }
    }

    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::UnknownType { .. } => "UNKNOWN_TYPE",
            CatalogError::Construction { .. } => "CONSTRUCTION_FAILED",
            CatalogError::DuplicateType { .. } => "DUPLICATE_TYPE",
            CatalogError::Load { .. } => "LOAD_FAILED",
            CatalogError::InvalidRule { .. } => "INVALID_RULE",
            CatalogError::InvalidConfig { .. } => "INVALID_CONFIG",
            CatalogError::Json(_) => "JSON_ERROR",
            CatalogError::Io { .. } => "IO_ERROR",
        }
    }

    /// Converts this error to a JSON-serializable response object
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
                recoverable: self.is_recoverable(),
                attempts: Vec::new(),
            },
        }
    }
}

/// A single failed attempt to load a URL through one candidate type
#[derive(Debug)]
pub struct AttemptRecord {
    /// Candidate type identifier
    pub type_id: String,
    /// Registration order of the rule that produced the candidate
    pub rule_order: usize,
    /// Why the attempt failed
    pub error: CatalogError,
    /// When the attempt started
    pub started_at: DateTime<Utc>,
    /// How long the attempt ran before failing
    pub elapsed_ms: u64,
}

impl AttemptRecord {
    fn to_detail(&self) -> AttemptDetail {
        AttemptDetail {
            type_id: self.type_id.clone(),
            rule_order: self.rule_order,
            code: self.error.error_code().to_string(),
            message: self.error.to_string(),
            elapsed_ms: self.elapsed_ms,
        }
    }
}

/// Terminal failure of a resolution call
///
/// The attempt history is always kept in order so a wrong classification
/// can be traced back through every rejected guess.
#[derive(Error, Debug)]
pub enum ResolutionFailure {
    /// No rule's predicate matched the URL; nothing was attempted
    #[error("No resolution rule matched '{url}'")]
    NoRuleMatched { url: String },

    /// Every candidate in the tier was attempted and failed
    #[error("Could not resolve '{url}' after {} attempt(s): {}", .attempts.len(), summarize(.attempts))]
    Exhausted {
        url: String,
        tier: Tier,
        attempts: Vec<AttemptRecord>,
    },

    /// The caller cancelled the resolution before it completed
    #[error("Resolution of '{url}' was cancelled")]
    Cancelled {
        url: String,
        attempts: Vec<AttemptRecord>,
    },
}

fn summarize(attempts: &[AttemptRecord]) -> String {
    attempts
        .iter()
        .map(|a| format!("{} ({})", a.type_id, a.error.error_code()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ResolutionFailure {
    /// True when the caller aborted; the UI should not report an error
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ResolutionFailure::Cancelled { .. })
    }

    /// The URL being resolved
    pub fn url(&self) -> &str {
        match self {
            ResolutionFailure::NoRuleMatched { url }
            | ResolutionFailure::Exhausted { url, .. }
            | ResolutionFailure::Cancelled { url, .. } => url,
        }
    }

    /// All failed attempts, in the order they were made
    pub fn attempts(&self) -> &[AttemptRecord] {
        match self {
            ResolutionFailure::NoRuleMatched { .. } => &[],
            ResolutionFailure::Exhausted { attempts, .. }
            | ResolutionFailure::Cancelled { attempts, .. } => attempts,
        }
    }

    /// Type identifiers attempted, in order
    pub fn attempted_type_ids(&self) -> Vec<&str> {
        self.attempts().iter().map(|a| a.type_id.as_str()).collect()
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ResolutionFailure::NoRuleMatched { .. } => ErrorCategory::NotFound,
            ResolutionFailure::Exhausted { .. } => ErrorCategory::Load,
            ResolutionFailure::Cancelled { .. } => ErrorCategory::Cancelled,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ResolutionFailure::NoRuleMatched { .. } => "NO_RULE_MATCHED",
            ResolutionFailure::Exhausted { .. } => "RESOLUTION_EXHAUSTED",
            ResolutionFailure::Cancelled { .. } => "CANCELLED",
        }
    }

    /// Converts this failure to a JSON-serializable response, including
    /// per-attempt details
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
                recoverable: false,
                attempts: self.attempts().iter().map(AttemptRecord::to_detail).collect(),
            },
        }
    }
}

/// JSON-serializable error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail for JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code (e.g., "UNKNOWN_TYPE")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error category
    pub category: ErrorCategory,
    /// Whether a speculative resolution may move past it
    pub recoverable: bool,
    /// Attempt history for resolution failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attempts: Vec<AttemptDetail>,
}

/// One attempt, flattened for JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptDetail {
    pub type_id: String,
    pub rule_order: usize,
    pub code: String,
    pub message: String,
    pub elapsed_ms: u64,
}
