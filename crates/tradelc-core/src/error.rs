//! # Error Types
//!
//! Defines the single error type returned by every ledger operation. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Each variant corresponds to one failure kind visible to the host.
//! - Messages are human-readable and name the offending key or argument.
//! - [`LedgerError::code`] gives a stable machine-readable code for hosts
//!   that need to branch on the kind without parsing messages.

use thiserror::Error;

use crate::store::StoreError;

/// Convenience alias used throughout the workspace.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// The invocation surface a function was called on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Mutating entry point; writes are allowed.
    Invoke,
    /// Read-only entry point.
    Query,
}

impl Surface {
    /// Lower-case surface name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoke => "invoke",
            Self::Query => "query",
        }
    }
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure kinds surfaced by the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Wrong argument count, unparseable payload, or a rejected value.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested key has no value in the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored bytes could not be decoded into the expected record.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// A record already exists and may not be re-created.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// Credentials did not match.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The store rejected a write.
    #[error("write error: {0}")]
    Write(String),

    /// The function name is not part of the declared surface.
    #[error("received unknown function {surface}: {function}")]
    UnknownFunction {
        /// Function name as received from the host.
        function: String,
        /// Surface the function was invoked on.
        surface: Surface,
    },
}

impl LedgerError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Deserialization(_) => "DESERIALIZATION_ERROR",
            Self::Duplicate(_) => "DUPLICATE",
            Self::Auth(_) => "AUTH_ERROR",
            Self::Write(_) => "WRITE_ERROR",
            Self::UnknownFunction { .. } => "UNKNOWN_FUNCTION",
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => Self::NotFound(format!("no state for key {key}")),
            StoreError::Write { .. } => Self::Write(err.to_string()),
        }
    }
}
