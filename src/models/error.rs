// Sys Manager - Error Types
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Shared error types for the Sys Manager services.

use thiserror::Error;

use crate::native::NativeError;

/// Result type alias for Sys Manager operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Sys Manager operations.
#[derive(Debug, Error)]
pub enum Error {
    // ========================================
    // Capability Errors
    // ========================================
    #[error("Backend unavailable: {backend} - {reason}")]
    BackendUnavailable { backend: String, reason: String },

    #[error("Operation failed: {operation} - {reason}")]
    OperationFailed { operation: String, reason: String },

    #[error("Partial success: {operation} ({succeeded} succeeded, {failed} failed)")]
    PartialSuccess {
        operation: String,
        succeeded: usize,
        failed: usize,
    },

    #[error("No wireless interface available")]
    NoInterface,

    #[error("Failed to decode native buffer: {0}")]
    Decode(String),

    // ========================================
    // Storage Errors
    // ========================================
    #[error("Failed to read configuration: {0}")]
    ConfigReadFailed(String),

    #[error("Failed to write configuration: {0}")]
    ConfigWriteFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParseFailed(String),

    // ========================================
    // System Errors
    // ========================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new backend unavailable error.
    pub fn backend_unavailable(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Create a new operation failed error.
    pub fn operation_failed(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error means the subsystem could not be initialized at all.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. })
    }
}

impl From<NativeError> for Error {
    fn from(err: NativeError) -> Self {
        match err {
            NativeError::Decode(reason) => Error::Decode(reason),
            other => Error::operation_failed(other.call(), other.to_string()),
        }
    }
}

// Convert from toml parse errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParseFailed(err.to_string())
    }
}

// Convert from toml serialize errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::ConfigWriteFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_error_conversion() {
        let err: Error = NativeError::status("WlanConnect", 1168).into();
        assert!(matches!(err, Error::OperationFailed { ref operation, .. } if operation == "WlanConnect"));
        assert!(!err.is_fatal());

        let err: Error = NativeError::Decode("truncated list".into()).into();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_backend_unavailable_is_fatal() {
        let err = Error::backend_unavailable("WLAN", "service not running");
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Backend unavailable: WLAN - service not running");
    }
}
