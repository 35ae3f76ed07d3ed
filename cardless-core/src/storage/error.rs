//! Error types for the secure storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by the secure stores.
#[derive(Debug, Error, uniffi::Error)]
pub enum StorageError {
    /// The platform secure storage could not be reached (permissions, device
    /// locked, keychain access denied). Fatal to the calling operation.
    #[error("secure storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The stored signature does not match the recomputed one.
    #[error("tamper detected in slot {0}")]
    TamperDetected(String),

    /// A value could not be serialized, or a stored payload is malformed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Some slots of a multi-slot save were written before one failed.
    #[error("partial save failure: slot {failed_slot} failed after writing {written:?}: {reason}")]
    PartialSaveFailure {
        /// Slots that were written before the failure.
        written: Vec<String>,
        /// The slot whose write failed.
        failed_slot: String,
        /// The underlying failure.
        reason: String,
    },

    /// A wallet mnemonic could not be decoded.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),
}

impl StorageError {
    /// Creates a storage-unavailable error.
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::StorageUnavailable(message.into())
    }

    /// Creates a serialization error.
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization(message.into())
    }

    /// Whether a read that hit this error must discard the slot and report
    /// absence instead of failing.
    #[must_use]
    pub const fn is_integrity_failure(&self) -> bool {
        matches!(self, Self::TamperDetected(_) | Self::Serialization(_))
    }
}

impl From<uniffi::UnexpectedUniFFICallbackError> for StorageError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::StorageUnavailable(error.reason)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
