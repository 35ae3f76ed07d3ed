//! In-memory implementations of the platform traits for testing.
//!
//! These implementations are NOT secure for production use. They back the unit
//! and integration tests of the stores and let tests inspect and corrupt the
//! raw persisted values.

// Allow certain clippy lints for test-only code
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use super::error::{StorageError, StorageResult};
use super::traits::{Clock, SecureBlobStore};

// =============================================================================
// Memory Secure Store
// =============================================================================

/// In-memory secure blob store backed by a `HashMap`.
///
/// Counts writes per service and can be switched into an unavailable mode in
/// which every call fails with [`StorageError::StorageUnavailable`].
#[derive(Debug, Default)]
pub struct MemorySecureStore {
    entries: RwLock<HashMap<String, String>>,
    writes: RwLock<HashMap<String, usize>>,
    unavailable: AtomicBool,
}

impl MemorySecureStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Returns whether a value is stored under `service`.
    #[must_use]
    pub fn contains(&self, service: &str) -> bool {
        self.entries.read().unwrap().contains_key(service)
    }

    /// Reads the raw stored value, bypassing availability checks.
    #[must_use]
    pub fn raw_get(&self, service: &str) -> Option<String> {
        self.entries.read().unwrap().get(service).cloned()
    }

    /// Overwrites the raw stored value without counting it as a write.
    pub fn raw_set(&self, service: &str, value: &str) {
        self.entries
            .write()
            .unwrap()
            .insert(service.to_string(), value.to_string());
    }

    /// Removes the raw stored value without going through the trait.
    pub fn raw_remove(&self, service: &str) {
        self.entries.write().unwrap().remove(service);
    }

    /// Number of successful `set` calls for `service`.
    #[must_use]
    pub fn write_count(&self, service: &str) -> usize {
        self.writes
            .read()
            .unwrap()
            .get(service)
            .copied()
            .unwrap_or_default()
    }

    /// Sorted list of all stored service names.
    #[must_use]
    pub fn services(&self) -> Vec<String> {
        let mut services: Vec<String> =
            self.entries.read().unwrap().keys().cloned().collect();
        services.sort();
        services
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("memory store marked unavailable"));
        }
        Ok(())
    }
}

impl SecureBlobStore for MemorySecureStore {
    fn get(&self, service: String) -> StorageResult<Option<String>> {
        self.check_available()?;
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::unavailable("lock poisoned"))?;
        Ok(entries.get(&service).cloned())
    }

    fn set(&self, service: String, value: String) -> StorageResult<()> {
        self.check_available()?;
        self.entries
            .write()
            .map_err(|_| StorageError::unavailable("lock poisoned"))?
            .insert(service.clone(), value);
        *self
            .writes
            .write()
            .map_err(|_| StorageError::unavailable("lock poisoned"))?
            .entry(service)
            .or_default() += 1;
        Ok(())
    }

    fn remove(&self, service: String) -> StorageResult<()> {
        self.check_available()?;
        self.entries
            .write()
            .map_err(|_| StorageError::unavailable("lock poisoned"))?
            .remove(&service);
        Ok(())
    }
}

// =============================================================================
// Fixed Clock
// =============================================================================

/// Manually driven clock.
#[derive(Debug, Default)]
pub struct FixedClock {
    millis: AtomicU64,
}

impl FixedClock {
    /// Creates a clock frozen at `millis`.
    #[must_use]
    pub const fn new(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    /// Moves the clock forward by `millis`.
    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}
