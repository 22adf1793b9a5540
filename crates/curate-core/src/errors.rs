//! Unified error system for Curate
//!
//! One error type covers every operation. `kind()` collapses it into the
//! taxonomy operators see in batch summaries.

use serde::{Deserialize, Serialize};

/// Unified error type for all Curate operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum CurateError {
    /// Referenced object id does not resolve
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found
        message: String,
    },

    /// Object or child type does not support the requested operation
    #[error("Not applicable: {message}")]
    NotApplicable {
        /// Why the operation does not apply
        message: String,
    },

    /// Deactivation requested but the object carries no timed state
    #[error("No active embargo or lease on {object_id}")]
    NoActiveTimedState {
        /// Object that was inspected
        object_id: String,
    },

    /// Deactivation requested before the deadline passed
    #[error("{kind} on {object_id} is still active until {deadline}")]
    StillActive {
        /// Object that was inspected
        object_id: String,
        /// "embargo" or "lease"
        kind: String,
        /// RFC 3339 deadline
        deadline: String,
    },

    /// Caller lacks the rights for the operation
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message describing the permission issue
        message: String,
    },

    /// Underlying store write or read failed
    #[error("Persist error: {message}")]
    Persist {
        /// Error message describing the storage failure
        message: String,
    },

    /// Invalid input
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

/// Coarse classification used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Object id did not resolve
    NotFound,
    /// Success with no work done
    NothingToDo,
    /// Timed state has not expired yet
    StillActive,
    /// Authorization denied
    Denied,
    /// Storage failure
    Storage,
    /// Bad input or configuration
    Invalid,
    /// Anything else
    Internal,
}

impl CurateError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a not applicable error
    pub fn not_applicable(message: impl Into<String>) -> Self {
        Self::NotApplicable {
            message: message.into(),
        }
    }

    /// Create a no active timed state error
    pub fn no_active_timed_state(object_id: impl Into<String>) -> Self {
        Self::NoActiveTimedState {
            object_id: object_id.into(),
        }
    }

    /// Create a still active error
    pub fn still_active(
        object_id: impl Into<String>,
        kind: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self::StillActive {
            object_id: object_id.into(),
            kind: kind.into(),
            deadline: deadline.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a persist error
    pub fn persist(message: impl Into<String>) -> Self {
        Self::Persist {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
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

    /// Classify this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotApplicable { .. } | Self::NoActiveTimedState { .. } => ErrorKind::NothingToDo,
            Self::StillActive { .. } => ErrorKind::StillActive,
            Self::Unauthorized { .. } => ErrorKind::Denied,
            Self::Persist { .. } | Self::Serialization { .. } => ErrorKind::Storage,
            Self::Invalid { .. } | Self::Config { .. } => ErrorKind::Invalid,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// True when the error means "nothing needed doing" rather than a failure.
    pub fn is_no_op(&self) -> bool {
        self.kind() == ErrorKind::NothingToDo
    }
}

/// Standard Result type for Curate operations
pub type Result<T> = std::result::Result<T, CurateError>;

impl From<serde_json::Error> for CurateError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<std::io::Error> for CurateError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::persist(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CurateError::invalid("test message");
        assert!(matches!(err, CurateError::Invalid { .. }));
        assert_eq!(err.to_string(), "Invalid: test message");
    }

    #[test]
    fn test_no_op_classification() {
        assert!(CurateError::no_active_timed_state("w1").is_no_op());
        assert!(CurateError::not_applicable("collection").is_no_op());
        assert!(!CurateError::unauthorized("nope").is_no_op());
        assert_eq!(CurateError::persist("disk").kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        assert!(matches!(
            CurateError::from(io_err),
            CurateError::NotFound { .. }
        ));
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(CurateError::from(io_err).kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_io_permission_denied_is_storage() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "EACCES");
        assert_eq!(CurateError::from(io_err).kind(), ErrorKind::Storage);
    }
}
