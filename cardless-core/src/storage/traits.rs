//! Platform interfaces for secure storage.

use std::time::{SystemTime, UNIX_EPOCH};

use super::error::StorageResult;

/// Platform secure credential store (Keychain / Android Keystore).
///
/// Values are opaque strings addressed by a service name. Implementations must
/// store them with device-only, when-unlocked accessibility.
#[uniffi::export(with_foreign)]
pub trait SecureBlobStore: Send + Sync {
    /// Reads the secret stored under `service`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageUnavailable`](super::StorageError::StorageUnavailable)
    /// if the platform store cannot be accessed.
    fn get(&self, service: String) -> StorageResult<Option<String>>;

    /// Stores `value` under `service`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&self, service: String, value: String) -> StorageResult<()>;

    /// Removes the secret stored under `service`. Removing a missing entry
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn remove(&self, service: String) -> StorageResult<()>;
}

/// Source of envelope timestamps.
#[uniffi::export(with_foreign)]
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}
